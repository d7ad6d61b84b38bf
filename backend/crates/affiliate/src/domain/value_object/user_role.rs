use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    Affiliate,
    Advertiser,
    Manager,
}

impl UserRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Admin => "admin",
            Affiliate => "affiliate",
            Advertiser => "advertiser",
            Manager => "manager",
        }
    }

    /// Roles that can be chosen on the public registration form
    #[inline]
    pub const fn is_self_service(&self) -> bool {
        matches!(self, UserRole::Affiliate | UserRole::Advertiser)
    }

    #[inline]
    pub const fn can_manage_campaigns(&self) -> bool {
        use UserRole::*;
        matches!(self, Admin | Advertiser | Manager)
    }

    pub fn from_code(code: &str) -> Option<Self> {
        use UserRole::*;
        match code {
            "admin" => Some(Admin),
            "affiliate" => Some(Affiliate),
            "advertiser" => Some(Advertiser),
            "manager" => Some(Manager),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
