//! Conversion lifecycle
//!
//! ```text
//! pending ──► approved ──► paid
//!    │
//!    └──────► rejected
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl ConversionStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use ConversionStatus::*;
        match self {
            Pending => "pending",
            Approved => "approved",
            Rejected => "rejected",
            Paid => "paid",
        }
    }

    /// Whether `next` is a legal successor of this status
    #[inline]
    pub const fn can_transition_to(&self, next: ConversionStatus) -> bool {
        use ConversionStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Paid)
        )
    }

    /// No further transitions are possible
    #[inline]
    pub const fn is_final(&self) -> bool {
        matches!(self, ConversionStatus::Rejected | ConversionStatus::Paid)
    }

    /// Counts towards the affiliate's earnings
    #[inline]
    pub const fn is_payable(&self) -> bool {
        matches!(self, ConversionStatus::Approved | ConversionStatus::Paid)
    }

    pub fn from_code(code: &str) -> Option<Self> {
        use ConversionStatus::*;
        match code {
            "pending" => Some(Pending),
            "approved" => Some(Approved),
            "rejected" => Some(Rejected),
            "paid" => Some(Paid),
            _ => None,
        }
    }
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ConversionStatus::*;
    use super::*;

    #[test]
    fn test_lifecycle() {
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Approved.can_transition_to(Paid));

        assert!(!Pending.can_transition_to(Paid));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!Paid.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_final_and_payable() {
        assert!(Rejected.is_final());
        assert!(Paid.is_final());
        assert!(!Approved.is_final());
        assert!(Approved.is_payable());
        assert!(!Pending.is_payable());
    }
}
