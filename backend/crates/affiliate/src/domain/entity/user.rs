//! User Entity
//!
//! Dashboard accounts (admins, affiliates, advertisers, managers) and the
//! extended profile shown on the settings page.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::domain::entity::conversion::Conversion;
use crate::domain::entity::link::AffiliateLink;
use crate::domain::entity::payment::PaymentMethod;
use crate::domain::value_object::{
    conversion_status::ConversionStatus, email::Email, user_role::UserRole,
};

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// ISO 3166-1 alpha-2 code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub is_verified: bool,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Apply a validated profile update to the account fields
    pub fn apply_profile(&mut self, update: &ProfileUpdate, now: DateTime<Utc>) {
        self.name = update.name.clone();
        if update.phone.is_some() {
            self.phone = update.phone.clone();
        }
        if update.country.is_some() {
            self.country = update.country.clone();
        }
        self.updated_at = now;
    }
}

/// Channel switches for notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub email: bool,
    pub push: bool,
    pub sms: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub notifications: NotificationPreferences,
    pub language: String,
    pub currency: String,
    pub timezone: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            notifications: NotificationPreferences {
                email: true,
                push: true,
                sms: false,
            },
            language: "pt-BR".to_string(),
            currency: "BRL".to_string(),
            timezone: "America/Sao_Paulo".to_string(),
        }
    }
}

/// Aggregated affiliate performance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_earnings: f64,
    pub total_conversions: u64,
    pub total_clicks: u64,
    /// Conversions per 100 clicks
    pub conversion_rate: f64,
    pub average_order_value: f64,
}

impl UserStats {
    /// Aggregate an affiliate's conversions and links
    ///
    /// Rejected conversions are ignored. Earnings only include approved and
    /// paid commissions. Rates are rounded to two decimals.
    pub fn from_activity(conversions: &[Conversion], links: &[AffiliateLink]) -> Self {
        let counted: Vec<&Conversion> = conversions
            .iter()
            .filter(|c| c.status != ConversionStatus::Rejected)
            .collect();

        let total_conversions = counted.len() as u64;
        let total_clicks: u64 = links.iter().map(|l| l.clicks).sum();
        let total_earnings: f64 = counted
            .iter()
            .filter(|c| c.status.is_payable())
            .map(|c| c.commission)
            .sum();

        let conversion_rate = if total_clicks == 0 {
            0.0
        } else {
            total_conversions as f64 / total_clicks as f64 * 100.0
        };

        let average_order_value = if counted.is_empty() {
            0.0
        } else {
            counted.iter().map(|c| c.amount).sum::<f64>() / counted.len() as f64
        };

        Self {
            total_earnings: round2(total_earnings),
            total_conversions,
            total_clicks,
            conversion_rate: round2(conversion_rate),
            average_order_value: round2(average_order_value),
        }
    }
}

/// Profile fields not stored on [`User`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
}

/// Full profile: account, extra details, payout methods and stats
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    #[serde(flatten)]
    pub details: ProfileDetails,
    pub payment_methods: Vec<PaymentMethod>,
    pub preferences: UserPreferences,
    pub stats: UserStats,
}

/// Validated profile changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
}

impl ProfileDetails {
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if update.bio.is_some() {
            self.bio = update.bio.clone();
        }
        if update.website.is_some() {
            self.website = update.website.clone();
        }
        if update.company.is_some() {
            self.company = update.company.clone();
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
