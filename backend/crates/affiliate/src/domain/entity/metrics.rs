//! Dashboard metrics and chart types

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{CampaignId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Percentage change against the previous period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    pub revenue: f64,
    pub commissions: f64,
    pub clicks: f64,
    pub conversions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPerformance {
    pub campaign_id: CampaignId,
    pub campaign_name: String,
    pub revenue: f64,
    pub conversions: u64,
    pub clicks: u64,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliatePerformance {
    pub affiliate_id: UserId,
    pub affiliate_name: String,
    pub revenue: f64,
    pub conversions: u64,
    pub commissions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryPerformance {
    pub country: String,
    pub country_name: String,
    pub revenue: f64,
    pub conversions: u64,
    pub clicks: u64,
}

/// Snapshot shown on the dashboard overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub period: MetricsPeriod,

    // Overview
    pub total_revenue: f64,
    pub total_commissions: f64,
    pub total_clicks: u64,
    pub total_conversions: u64,

    // Rates
    pub conversion_rate: f64,
    pub click_through_rate: f64,
    pub average_order_value: f64,
    pub earnings_per_click: f64,

    pub growth: Growth,

    // Top performers
    pub top_campaigns: Vec<CampaignPerformance>,
    pub top_affiliates: Vec<AffiliatePerformance>,
    pub top_countries: Vec<CountryPerformance>,
}

/// One day of analytics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub value: u64,
    pub conversions: u64,
    pub clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    pub date: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub data: Vec<ChartDataPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ChartSeries {
    /// Project one metric of each day into a series
    pub fn from_daily(
        name: impl Into<String>,
        stats: &[DailyStat],
        metric: impl Fn(&DailyStat) -> u64,
    ) -> Self {
        Self {
            name: name.into(),
            data: stats
                .iter()
                .map(|s| ChartDataPoint {
                    date: s.date.format("%Y-%m-%d").to_string(),
                    value: metric(s) as f64,
                    label: None,
                })
                .collect(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_from_daily() {
        let stats = vec![
            DailyStat {
                date: NaiveDate::from_ymd_opt(2024, 8, 23).unwrap(),
                value: 7000,
                conversions: 60,
                clicks: 900,
            },
            DailyStat {
                date: NaiveDate::from_ymd_opt(2024, 8, 24).unwrap(),
                value: 8000,
                conversions: 70,
                clicks: 1000,
            },
        ];

        let series = ChartSeries::from_daily("Cliques", &stats, |s| s.clicks).with_color("#6366f1");
        assert_eq!(series.data.len(), 2);
        assert_eq!(series.data[0].date, "2024-08-23");
        assert_eq!(series.data[1].value, 1000.0);
        assert_eq!(series.color.as_deref(), Some("#6366f1"));
    }

    #[test]
    fn test_daily_stat_date_format() {
        let stat = DailyStat {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            value: 5000,
            conversions: 50,
            clicks: 500,
        };
        let json = serde_json::to_value(stat).unwrap();
        assert_eq!(json["date"], "2024-01-05");
    }
}
