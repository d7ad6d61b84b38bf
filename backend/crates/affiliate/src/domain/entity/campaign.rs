//! Campaign Entity
//!
//! An advertiser's offer that affiliates promote. Carries budget and
//! commission terms, running performance counters, targeting and media.

use chrono::{DateTime, Utc};
use kernel::id::{CampaignId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{
    campaign_status::CampaignStatus, commission_type::CommissionType, device::Device,
};

/// Name given to campaigns created without one
pub const DEFAULT_CAMPAIGN_NAME: &str = "Nova Campanha";
/// Category given to campaigns created without one
pub const DEFAULT_CATEGORY: &str = "Outros";
/// Commission rate given to campaigns created without one
pub const DEFAULT_COMMISSION_RATE: f64 = 10.0;
/// Advertiser (`user_3`) owning campaigns created without an explicit owner
const DEFAULT_ADVERTISER_SUFFIX: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: CampaignStatus,
    pub category: String,

    // Financial
    pub budget: f64,
    pub spent: f64,
    pub revenue: f64,
    pub commission_rate: f64,
    pub commission_type: CommissionType,

    // Performance
    pub clicks: u64,
    pub conversions: u64,
    pub conversion_rate: f64,
    /// Click-through rate
    pub ctr: f64,
    /// Earnings per click
    pub epc: f64,

    // Targeting
    pub countries: Vec<String>,
    pub devices: Vec<Device>,
    pub traffic_sources: Vec<String>,

    // Dates
    pub start_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Relations
    pub advertiser_id: UserId,
    pub created_by: UserId,

    // Media
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
    pub landing_page_url: String,

    // Settings
    pub is_private: bool,
    pub requires_approval: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_daily_budget: Option<f64>,
}

/// Input for a new campaign; absent fields receive defaults
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub budget: Option<f64>,
    pub commission_rate: Option<f64>,
    pub commission_type: Option<CommissionType>,
    pub countries: Option<Vec<String>>,
    pub devices: Option<Vec<Device>>,
    pub traffic_sources: Option<Vec<String>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub advertiser_id: Option<UserId>,
    pub created_by: Option<UserId>,
    pub images: Option<Vec<String>>,
    pub banner_url: Option<String>,
    pub landing_page_url: Option<String>,
    pub is_private: Option<bool>,
    pub requires_approval: Option<bool>,
    pub max_daily_budget: Option<f64>,
}

/// Partial update; present fields overwrite the stored campaign
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<CampaignStatus>,
    pub category: Option<String>,
    pub budget: Option<f64>,
    pub commission_rate: Option<f64>,
    pub commission_type: Option<CommissionType>,
    pub countries: Option<Vec<String>>,
    pub devices: Option<Vec<Device>>,
    pub traffic_sources: Option<Vec<String>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub images: Option<Vec<String>>,
    pub banner_url: Option<String>,
    pub landing_page_url: Option<String>,
    pub is_private: Option<bool>,
    pub requires_approval: Option<bool>,
    pub max_daily_budget: Option<f64>,
}

impl Campaign {
    /// Build a new draft campaign with zeroed counters
    pub fn from_draft(id: CampaignId, draft: CampaignDraft, now: DateTime<Utc>) -> Self {
        let default_owner = || UserId::from_suffix(DEFAULT_ADVERTISER_SUFFIX);

        Self {
            id,
            name: draft.name.unwrap_or_else(|| DEFAULT_CAMPAIGN_NAME.to_string()),
            description: draft.description,
            status: CampaignStatus::Draft,
            category: draft.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            budget: draft.budget.unwrap_or(0.0),
            spent: 0.0,
            revenue: 0.0,
            commission_rate: draft.commission_rate.unwrap_or(DEFAULT_COMMISSION_RATE),
            commission_type: draft.commission_type.unwrap_or_default(),
            clicks: 0,
            conversions: 0,
            conversion_rate: 0.0,
            ctr: 0.0,
            epc: 0.0,
            countries: draft.countries.unwrap_or_else(|| vec!["BR".to_string()]),
            devices: draft.devices.unwrap_or_else(Device::default_targeting),
            traffic_sources: draft.traffic_sources.unwrap_or_default(),
            start_date: draft.start_date.unwrap_or(now),
            end_date: draft.end_date,
            created_at: now,
            updated_at: now,
            advertiser_id: draft.advertiser_id.unwrap_or_else(default_owner),
            created_by: draft.created_by.unwrap_or_else(default_owner),
            images: draft.images.unwrap_or_default(),
            banner_url: draft.banner_url,
            landing_page_url: draft.landing_page_url.unwrap_or_default(),
            is_private: draft.is_private.unwrap_or(false),
            requires_approval: draft.requires_approval.unwrap_or(true),
            max_daily_budget: draft.max_daily_budget,
        }
    }

    /// Merge present fields and bump `updated_at`
    pub fn apply_patch(&mut self, patch: CampaignPatch, now: DateTime<Utc>) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = patch.$field { self.$field = value; })*
            };
        }
        macro_rules! merge_optional {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = patch.$field { self.$field = Some(value); })*
            };
        }

        merge!(
            name,
            status,
            category,
            budget,
            commission_rate,
            commission_type,
            countries,
            devices,
            traffic_sources,
            start_date,
            images,
            landing_page_url,
            is_private,
            requires_approval,
        );
        merge_optional!(description, end_date, banner_url, max_daily_budget);

        self.updated_at = now;
    }

    /// Budget not yet spent, never negative
    pub fn remaining_budget(&self) -> f64 {
        (self.budget - self.spent).max(0.0)
    }

    /// Active and within its start/end window at `now`
    pub fn is_running(&self, now: DateTime<Utc>) -> bool {
        self.status.is_active()
            && self.start_date <= now
            && self.end_date.is_none_or(|end| now <= end)
    }

    /// Commission owed for an order of `amount`
    pub fn commission_for(&self, amount: f64) -> f64 {
        self.commission_type.commission_for(self.commission_rate, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn new_campaign(draft: CampaignDraft) -> Campaign {
        Campaign::from_draft(CampaignId::from_suffix(9), draft, at(2024, 9, 1))
    }

    #[test]
    fn test_from_draft_defaults() {
        let campaign = new_campaign(CampaignDraft::default());

        assert_eq!(campaign.name, "Nova Campanha");
        assert_eq!(campaign.status, CampaignStatus::Draft);
        assert_eq!(campaign.category, "Outros");
        assert_eq!(campaign.budget, 0.0);
        assert_eq!(campaign.commission_rate, 10.0);
        assert_eq!(campaign.commission_type, CommissionType::Percentage);
        assert_eq!(campaign.countries, vec!["BR".to_string()]);
        assert_eq!(campaign.devices, vec![Device::Desktop, Device::Mobile]);
        assert_eq!(campaign.advertiser_id.as_str(), "user_3");
        assert_eq!(campaign.created_by.as_str(), "user_3");
        assert_eq!(campaign.clicks, 0);
        assert_eq!(campaign.start_date, at(2024, 9, 1));
        assert!(campaign.requires_approval);
        assert!(!campaign.is_private);
    }

    #[test]
    fn test_from_draft_respects_explicit_values() {
        let campaign = new_campaign(CampaignDraft {
            name: Some("Cyber Monday".to_string()),
            commission_rate: Some(0.0),
            requires_approval: Some(false),
            created_by: Some(UserId::from_suffix(1)),
            ..Default::default()
        });

        assert_eq!(campaign.name, "Cyber Monday");
        assert_eq!(campaign.commission_rate, 0.0);
        assert!(!campaign.requires_approval);
        assert_eq!(campaign.created_by.as_str(), "user_1");
        assert_eq!(campaign.advertiser_id.as_str(), "user_3");
    }

    #[test]
    fn test_apply_patch_merges_present_fields() {
        let mut campaign = new_campaign(CampaignDraft {
            description: Some("old".to_string()),
            ..Default::default()
        });
        let later = at(2024, 9, 2);

        campaign.apply_patch(
            CampaignPatch {
                status: Some(CampaignStatus::Active),
                budget: Some(5000.0),
                ..Default::default()
            },
            later,
        );

        assert_eq!(campaign.status, CampaignStatus::Active);
        assert_eq!(campaign.budget, 5000.0);
        assert_eq!(campaign.name, "Nova Campanha");
        assert_eq!(campaign.description.as_deref(), Some("old"));
        assert_eq!(campaign.updated_at, later);
        assert_eq!(campaign.created_at, at(2024, 9, 1));
    }

    #[test]
    fn test_remaining_budget() {
        let mut campaign = new_campaign(CampaignDraft {
            budget: Some(100.0),
            ..Default::default()
        });
        campaign.spent = 30.0;
        assert_eq!(campaign.remaining_budget(), 70.0);
        campaign.spent = 130.0;
        assert_eq!(campaign.remaining_budget(), 0.0);
    }

    #[test]
    fn test_is_running() {
        let mut campaign = new_campaign(CampaignDraft {
            start_date: Some(at(2024, 11, 1)),
            end_date: Some(at(2024, 12, 1)),
            ..Default::default()
        });
        assert!(!campaign.is_running(at(2024, 11, 15)));

        campaign.status = CampaignStatus::Active;
        assert!(campaign.is_running(at(2024, 11, 15)));
        assert!(!campaign.is_running(at(2024, 10, 31)));
        assert!(!campaign.is_running(at(2024, 12, 2)));

        campaign.end_date = None;
        assert!(campaign.is_running(at(2030, 1, 1)));
    }

    #[test]
    fn test_serializes_camel_case_without_absent_fields() {
        let campaign = new_campaign(CampaignDraft::default());
        let json = serde_json::to_value(&campaign).unwrap();

        assert_eq!(json["id"], "camp_9");
        assert_eq!(json["commissionType"], "percentage");
        assert_eq!(json["landingPageUrl"], "");
        assert!(json.get("endDate").is_none());
        assert!(json.get("bannerUrl").is_none());
    }
}
