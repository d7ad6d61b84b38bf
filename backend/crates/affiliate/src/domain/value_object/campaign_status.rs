use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Active,
    Paused,
    Ended,
}

impl CampaignStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use CampaignStatus::*;
        match self {
            Draft => "draft",
            Active => "active",
            Paused => "paused",
            Ended => "ended",
        }
    }

    /// Whether the campaign accepts traffic
    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self, CampaignStatus::Active)
    }

    pub fn from_code(code: &str) -> Option<Self> {
        use CampaignStatus::*;
        match code {
            "draft" => Some(Draft),
            "active" => Some(Active),
            "paused" => Some(Paused),
            "ended" => Some(Ended),
            _ => None,
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
