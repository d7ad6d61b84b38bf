//! Affiliate Link Entity

use chrono::{DateTime, Utc};
use kernel::id::{CampaignId, LinkId, UserId};
use serde::{Deserialize, Serialize};
use url::Url;

/// UTM attribution tags appended to the destination URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
}

impl UtmParams {
    /// Present tags as `(utm_<name>, value)` query pairs, in canonical order
    pub fn query_pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("utm_source", &self.source),
            ("utm_medium", &self.medium),
            ("utm_campaign", &self.campaign),
            ("utm_content", &self.content),
            ("utm_term", &self.term),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateLink {
    pub id: LinkId,
    pub campaign_id: CampaignId,
    pub affiliate_id: UserId,

    pub short_url: String,
    pub original_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    // Performance
    pub clicks: u64,
    pub unique_clicks: u64,
    pub conversions: u64,

    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    pub utm_params: UtmParams,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AffiliateLink {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Active and not expired
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired(now)
    }

    /// Destination URL with the link's UTM tags appended
    ///
    /// Tags already present on the original URL are replaced.
    pub fn tracking_url(&self) -> Result<String, url::ParseError> {
        let mut url = Url::parse(&self.original_url)?;
        let tags: Vec<(&str, &str)> = self.utm_params.query_pairs().collect();
        if tags.is_empty() {
            return Ok(url.into());
        }

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !tags.iter().any(|(tag, _)| key.as_ref() == *tag))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .extend_pairs(tags);

        Ok(url.into())
    }

    /// Count a click
    pub fn record_click(&mut self, unique: bool, now: DateTime<Utc>) {
        self.clicks += 1;
        if unique {
            self.unique_clicks += 1;
        }
        self.updated_at = now;
    }
}
