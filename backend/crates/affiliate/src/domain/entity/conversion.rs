//! Conversion Entity
//!
//! A purchase or action attributed to an affiliate's click.

use chrono::{DateTime, Utc};
use kernel::id::{CampaignId, ClickId, ConversionId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{conversion_status::ConversionStatus, device::Device};
use crate::error::{AffiliateError, AffiliateResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub id: ConversionId,
    pub campaign_id: CampaignId,
    pub affiliate_id: UserId,
    pub advertiser_id: UserId,

    // Tracking
    pub click_id: ClickId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    // Financial
    pub amount: f64,
    pub currency: String,
    pub commission: f64,

    pub status: ConversionStatus,

    // Attribution
    pub click_timestamp: DateTime<Utc>,
    pub conversion_timestamp: DateTime<Utc>,

    // Customer data (anonymized)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_country: Option<String>,
    pub customer_device: Device,
    #[serde(default, rename = "customerOS", skip_serializing_if = "Option::is_none")]
    pub customer_os: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_browser: Option<String>,

    // Metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversion {
    /// Move to `next` if the lifecycle allows it
    pub fn transition_to(&mut self, next: ConversionStatus, now: DateTime<Utc>) -> AffiliateResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(AffiliateError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        tracing::debug!(
            conversion_id = %self.id,
            from = %self.status,
            to = %next,
            "Conversion status changed"
        );

        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    /// Time between click and conversion
    pub fn attribution_delay(&self) -> chrono::Duration {
        self.conversion_timestamp - self.click_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pending() -> Conversion {
        let at = Utc.with_ymd_and_hms(2024, 8, 24, 10, 30, 0).unwrap();
        Conversion {
            id: ConversionId::from_suffix(2),
            campaign_id: CampaignId::from_suffix(2),
            affiliate_id: UserId::from_suffix(2),
            advertiser_id: UserId::from_suffix(3),
            click_id: ClickId::from_suffix(654321),
            transaction_id: None,
            order_id: None,
            amount: 497.0,
            currency: "BRL".to_string(),
            commission: 124.25,
            status: ConversionStatus::Pending,
            click_timestamp: Utc.with_ymd_and_hms(2024, 8, 24, 10, 15, 0).unwrap(),
            conversion_timestamp: at,
            customer_country: Some("BR".to_string()),
            customer_device: Device::Desktop,
            customer_os: Some("Windows".to_string()),
            customer_browser: None,
            referrer: None,
            utm_source: None,
            utm_medium: None,
            utm_campaign: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_transition_follows_lifecycle() {
        let mut conversion = pending();
        let later = conversion.updated_at + chrono::Duration::hours(1);

        conversion.transition_to(ConversionStatus::Approved, later).unwrap();
        assert_eq!(conversion.status, ConversionStatus::Approved);
        assert_eq!(conversion.updated_at, later);

        conversion.transition_to(ConversionStatus::Paid, later).unwrap();
        assert_eq!(conversion.status, ConversionStatus::Paid);
    }

    #[test]
    fn test_transition_rejects_illegal_moves() {
        let mut conversion = pending();
        let before = conversion.updated_at;

        let err = conversion
            .transition_to(ConversionStatus::Paid, before + chrono::Duration::hours(1))
            .unwrap_err();
        assert!(matches!(
            err,
            AffiliateError::InvalidTransition {
                from: ConversionStatus::Pending,
                to: ConversionStatus::Paid
            }
        ));
        assert_eq!(conversion.status, ConversionStatus::Pending);
        assert_eq!(conversion.updated_at, before);
    }

    #[test]
    fn test_attribution_delay() {
        assert_eq!(pending().attribution_delay(), chrono::Duration::minutes(15));
    }

    #[test]
    fn test_serde_field_names() {
        let json = serde_json::to_value(pending()).unwrap();
        assert_eq!(json["customerOS"], "Windows");
        assert_eq!(json["clickId"], "click_654321");
        assert!(json.get("transactionId").is_none());
    }
}
