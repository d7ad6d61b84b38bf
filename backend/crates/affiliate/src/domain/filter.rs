//! Listing filters
//!
//! Filters are plain data; `matches` decides membership and `apply` filters
//! and orders a snapshot.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use kernel::id::{CampaignId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{campaign::Campaign, conversion::Conversion};
use crate::domain::value_object::{
    campaign_status::CampaignStatus, conversion_status::ConversionStatus,
};
use crate::error::{AffiliateError, AffiliateResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatePeriod {
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    #[serde(rename = "custom")]
    Custom,
}

impl DatePeriod {
    pub const fn days(&self) -> Option<i64> {
        match self {
            DatePeriod::Last7Days => Some(7),
            DatePeriod::Last30Days => Some(30),
            DatePeriod::Last90Days => Some(90),
            DatePeriod::Custom => None,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "7d" => Some(DatePeriod::Last7Days),
            "30d" => Some(DatePeriod::Last30Days),
            "90d" => Some(DatePeriod::Last90Days),
            "custom" => Some(DatePeriod::Custom),
            _ => None,
        }
    }
}

/// Inclusive time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub period: DatePeriod,
}

impl DateRange {
    /// Window of a preset period ending at `now`; `None` for custom
    pub fn last(period: DatePeriod, now: DateTime<Utc>) -> Option<Self> {
        period.days().map(|days| Self {
            start: now - Duration::days(days),
            end: now,
            period,
        })
    }

    pub fn custom(start: DateTime<Utc>, end: DateTime<Utc>) -> AffiliateResult<Self> {
        if start > end {
            return Err(AffiliateError::invalid("start", "Start must not be after end"));
        }
        Ok(Self {
            start,
            end,
            period: DatePeriod::Custom,
        })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Name,
    Revenue,
    Conversions,
    Created,
}

impl SortField {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "name" => Some(SortField::Name),
            "revenue" => Some(SortField::Revenue),
            "conversions" => Some(SortField::Conversions),
            "created" => Some(SortField::Created),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Campaign listing filter
///
/// Empty lists and `None` mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignFilter {
    pub status: Vec<CampaignStatus>,
    /// Creator of the campaign
    pub user_id: Option<UserId>,
    /// Case-insensitive match over name, description and category
    pub search: Option<String>,
    pub category: Vec<String>,
    /// Campaigns targeting any of these countries
    pub country: Vec<String>,
    pub sort_by: Option<SortField>,
    pub sort_order: SortOrder,
}

impl CampaignFilter {
    pub fn matches(&self, campaign: &Campaign) -> bool {
        if !self.status.is_empty() && !self.status.contains(&campaign.status) {
            return false;
        }

        if self
            .user_id
            .as_ref()
            .is_some_and(|user| &campaign.created_by != user)
        {
            return false;
        }

        if let Some(search) = self.search.as_deref().map(str::to_lowercase) {
            let hit = campaign.name.to_lowercase().contains(&search)
                || campaign
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&search))
                || campaign.category.to_lowercase().contains(&search);
            if !hit {
                return false;
            }
        }

        if !self.category.is_empty()
            && !self
                .category
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&campaign.category))
        {
            return false;
        }

        if !self.country.is_empty()
            && !campaign
                .countries
                .iter()
                .any(|c| self.country.iter().any(|wanted| wanted.eq_ignore_ascii_case(c)))
        {
            return false;
        }

        true
    }

    /// Filter then sort; order is preserved when no sort field is set
    pub fn apply(&self, campaigns: impl IntoIterator<Item = Campaign>) -> Vec<Campaign> {
        let mut matched: Vec<Campaign> = campaigns.into_iter().filter(|c| self.matches(c)).collect();

        if let Some(field) = self.sort_by {
            matched.sort_by(|a, b| {
                let ordering = compare_campaigns(a, b, field);
                match self.sort_order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        matched
    }
}

fn compare_campaigns(a: &Campaign, b: &Campaign, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Revenue => a.revenue.total_cmp(&b.revenue),
        SortField::Conversions => a.conversions.cmp(&b.conversions),
        SortField::Created => a.created_at.cmp(&b.created_at),
    }
}

/// Conversion listing filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionFilter {
    pub campaign_id: Option<CampaignId>,
    pub affiliate_id: Option<UserId>,
    pub status: Vec<ConversionStatus>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    /// Window over the conversion timestamp
    pub range: Option<DateRange>,
}

impl ConversionFilter {
    pub fn matches(&self, conversion: &Conversion) -> bool {
        self.campaign_id
            .as_ref()
            .is_none_or(|id| &conversion.campaign_id == id)
            && self
                .affiliate_id
                .as_ref()
                .is_none_or(|id| &conversion.affiliate_id == id)
            && (self.status.is_empty() || self.status.contains(&conversion.status))
            && self.min_amount.is_none_or(|min| conversion.amount >= min)
            && self.max_amount.is_none_or(|max| conversion.amount <= max)
            && self
                .range
                .is_none_or(|range| range.contains(conversion.conversion_timestamp))
    }

    pub fn apply(&self, conversions: impl IntoIterator<Item = Conversion>) -> Vec<Conversion> {
        conversions.into_iter().filter(|c| self.matches(c)).collect()
    }
}
