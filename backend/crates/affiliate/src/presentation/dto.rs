//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{CampaignId, Id, IdPrefix, LinkId, UserId};
use serde::{Deserialize, Serialize};

use crate::application::config::AffiliateConfig;
use crate::application::pagination::PageRequest;
use crate::application::{ListCampaignsInput, RegisterOutput};
use crate::domain::filter::{
    CampaignFilter, ConversionFilter, DatePeriod, DateRange, SortField, SortOrder,
};
use crate::domain::value_object::{CampaignStatus, ConversionStatus, UserRole};
use crate::error::{AffiliateError, AffiliateResult, FieldError};

/// Split a comma-separated query value, skipping blanks
fn split_list(value: Option<&str>) -> impl Iterator<Item = &str> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parse every code of a comma-separated list, recording unknown ones
fn parse_codes<T>(
    field: &'static str,
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
    errors: &mut Vec<FieldError>,
) -> Vec<T> {
    let mut parsed = Vec::new();
    for code in split_list(value) {
        match parse(code) {
            Some(item) => parsed.push(item),
            None => errors.push(FieldError::new(field, format!("Unknown value `{code}`"))),
        }
    }
    parsed
}

fn parse_id<T: IdPrefix>(
    field: &'static str,
    value: Option<&str>,
    errors: &mut Vec<FieldError>,
) -> Option<Id<T>> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    match Id::parse(value) {
        Ok(id) => Some(id),
        Err(err) => {
            errors.push(FieldError::new(field, err.to_string()));
            None
        }
    }
}

fn finish<T>(errors: Vec<FieldError>, value: T) -> AffiliateResult<T> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(AffiliateError::Validation(errors))
    }
}

// ============================================================================
// Campaigns
// ============================================================================

/// `GET /campaigns` query; list values are comma-separated
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub user_id: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl CampaignListQuery {
    pub fn into_input(self, config: &AffiliateConfig) -> AffiliateResult<ListCampaignsInput> {
        let mut errors = Vec::new();

        let status = parse_codes(
            "status",
            self.status.as_deref(),
            CampaignStatus::from_code,
            &mut errors,
        );
        let user_id: Option<UserId> = parse_id("userId", self.user_id.as_deref(), &mut errors);
        let sort_by = self.sort_by.as_deref().and_then(|code| {
            let field = SortField::from_code(code);
            if field.is_none() {
                errors.push(FieldError::new("sortBy", format!("Unknown value `{code}`")));
            }
            field
        });
        let sort_order = match self.sort_order.as_deref() {
            None => SortOrder::default(),
            Some(code) => SortOrder::from_code(code).unwrap_or_else(|| {
                errors.push(FieldError::new("sortOrder", format!("Unknown value `{code}`")));
                SortOrder::default()
            }),
        };

        let filter = CampaignFilter {
            status,
            user_id,
            search: self
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            category: split_list(self.category.as_deref()).map(str::to_string).collect(),
            country: split_list(self.country.as_deref()).map(str::to_string).collect(),
            sort_by,
            sort_order,
        };

        finish(
            errors,
            ListCampaignsInput {
                filter,
                page: PageRequest::new(self.page, self.limit, config),
            },
        )
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// `GET /conversions` query
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionListQuery {
    pub campaign_id: Option<String>,
    pub affiliate_id: Option<String>,
    pub status: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    /// `7d`, `30d`, `90d` or `custom`
    pub period: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl ConversionListQuery {
    pub fn into_filter(self, now: DateTime<Utc>) -> AffiliateResult<ConversionFilter> {
        let mut errors = Vec::new();

        let campaign_id: Option<CampaignId> =
            parse_id("campaignId", self.campaign_id.as_deref(), &mut errors);
        let affiliate_id: Option<UserId> =
            parse_id("affiliateId", self.affiliate_id.as_deref(), &mut errors);
        let status = parse_codes(
            "status",
            self.status.as_deref(),
            ConversionStatus::from_code,
            &mut errors,
        );

        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount) {
            if min > max {
                errors.push(FieldError::new("minAmount", "Minimum must not exceed maximum"));
            }
        }

        let period = match self.period.as_deref() {
            Some(code) => match DatePeriod::from_code(code) {
                Some(period) => Some(period),
                None => {
                    errors.push(FieldError::new("period", format!("Unknown value `{code}`")));
                    None
                }
            },
            None if self.start.is_some() || self.end.is_some() => Some(DatePeriod::Custom),
            None => None,
        };

        let range = match period {
            Some(DatePeriod::Custom) => match (self.start, self.end) {
                (Some(start), Some(end)) => match DateRange::custom(start, end) {
                    Ok(range) => Some(range),
                    Err(AffiliateError::Validation(mut fields)) => {
                        errors.append(&mut fields);
                        None
                    }
                    Err(other) => return Err(other),
                },
                _ => {
                    errors.push(FieldError::new("start", "Custom period needs start and end"));
                    None
                }
            },
            Some(preset) => DateRange::last(preset, now),
            None => None,
        };

        finish(
            errors,
            ConversionFilter {
                campaign_id,
                affiliate_id,
                status,
                min_amount: self.min_amount,
                max_amount: self.max_amount,
                range,
            },
        )
    }
}

// ============================================================================
// Analytics
// ============================================================================

/// `GET /analytics/chart` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartQuery {
    pub days: Option<u32>,
}

// ============================================================================
// Uploads
// ============================================================================

/// Declared metadata of a file the dashboard is about to upload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadValidateRequest {
    pub filename: String,
    pub mimetype: String,
    pub size: u64,
}

// ============================================================================
// Tracking
// ============================================================================

/// `POST /track` body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackClickRequest {
    pub link_id: LinkId,
    #[serde(default)]
    pub unique: bool,
}

// ============================================================================
// CSRF / Registration
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
    /// Header the token must be echoed in
    pub header_name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<RegisterOutput> for RegisterResponse {
    fn from(output: RegisterOutput) -> Self {
        Self {
            name: output.name,
            email: output.email.into(),
            role: output.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn field_names(err: AffiliateError) -> Vec<&'static str> {
        match err {
            AffiliateError::Validation(fields) => fields.into_iter().map(|f| f.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_campaign_query_parses_lists() {
        let query = CampaignListQuery {
            page: Some(2),
            limit: Some(5),
            status: Some("active, paused,".to_string()),
            user_id: Some("user_3".to_string()),
            search: Some("  curso ".to_string()),
            country: Some("BR,PT".to_string()),
            sort_by: Some("revenue".to_string()),
            sort_order: Some("desc".to_string()),
            ..Default::default()
        };
        let input = query.into_input(&AffiliateConfig::default()).unwrap();

        assert_eq!(input.filter.status, vec![CampaignStatus::Active, CampaignStatus::Paused]);
        assert_eq!(input.filter.user_id, Some(UserId::from_suffix(3)));
        assert_eq!(input.filter.search.as_deref(), Some("curso"));
        assert_eq!(input.filter.country, vec!["BR", "PT"]);
        assert_eq!(input.filter.sort_by, Some(SortField::Revenue));
        assert_eq!(input.filter.sort_order, SortOrder::Desc);
        assert_eq!(input.page, PageRequest { page: 2, limit: 5 });
    }

    #[test]
    fn test_campaign_query_rejects_unknown_codes() {
        let query = CampaignListQuery {
            status: Some("active,archived".to_string()),
            user_id: Some("camp_1".to_string()),
            sort_by: Some("ctr".to_string()),
            sort_order: Some("sideways".to_string()),
            ..Default::default()
        };
        assert_eq!(
            field_names(query.into_input(&AffiliateConfig::default()).unwrap_err()),
            vec!["status", "userId", "sortBy", "sortOrder"]
        );
    }

    #[test]
    fn test_conversion_query_periods() {
        let now = Utc.with_ymd_and_hms(2024, 8, 24, 12, 0, 0).unwrap();

        let preset = ConversionListQuery {
            period: Some("7d".to_string()),
            status: Some("pending".to_string()),
            ..Default::default()
        }
        .into_filter(now)
        .unwrap();
        let range = preset.range.unwrap();
        assert_eq!(range.period, DatePeriod::Last7Days);
        assert_eq!(range.end, now);
        assert_eq!(preset.status, vec![ConversionStatus::Pending]);

        let implied_custom = ConversionListQuery {
            start: Some(now - chrono::Duration::days(2)),
            end: Some(now),
            ..Default::default()
        }
        .into_filter(now)
        .unwrap();
        assert_eq!(implied_custom.range.unwrap().period, DatePeriod::Custom);

        assert!(ConversionListQuery::default().into_filter(now).unwrap().range.is_none());
    }

    #[test]
    fn test_conversion_query_errors() {
        let now = Utc::now();
        let query = ConversionListQuery {
            campaign_id: Some("user_1".to_string()),
            min_amount: Some(100.0),
            max_amount: Some(10.0),
            period: Some("custom".to_string()),
            start: Some(now),
            ..Default::default()
        };
        assert_eq!(
            field_names(query.into_filter(now).unwrap_err()),
            vec!["campaignId", "minAmount", "start"]
        );

        let inverted = ConversionListQuery {
            start: Some(now),
            end: Some(now - chrono::Duration::hours(1)),
            ..Default::default()
        };
        assert_eq!(field_names(inverted.into_filter(now).unwrap_err()), vec!["start"]);
    }
}
