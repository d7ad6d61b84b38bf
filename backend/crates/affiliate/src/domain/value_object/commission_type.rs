use serde::{Deserialize, Serialize};

/// How a campaign's `commission_rate` is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionType {
    /// Rate is a percentage of the order amount
    #[default]
    Percentage,
    /// Rate is a flat amount per conversion
    Fixed,
}

impl CommissionType {
    /// Commission earned on an order of `amount`
    pub fn commission_for(&self, rate: f64, amount: f64) -> f64 {
        match self {
            CommissionType::Percentage => amount * rate / 100.0,
            CommissionType::Fixed => rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commission_for() {
        let pct = CommissionType::Percentage.commission_for(8.5, 299.90);
        assert!((pct - 25.4915).abs() < 1e-9);
        assert_eq!(CommissionType::Fixed.commission_for(15.0, 299.90), 15.0);
    }
}
