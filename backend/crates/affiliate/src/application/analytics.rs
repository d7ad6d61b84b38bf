//! Analytics Use Cases
//!
//! Dashboard snapshot, chart series and per-affiliate statistics.

use std::sync::Arc;

use kernel::id::UserId;
use serde::Serialize;

use crate::application::config::AffiliateConfig;
use crate::domain::entity::{ChartSeries, DailyStat, DashboardMetrics, UserStats};
use crate::domain::filter::ConversionFilter;
use crate::domain::repository::{
    ConversionRepository, LinkRepository, MetricsRepository, UserRepository,
};
use crate::error::{AffiliateError, AffiliateResult};

const REVENUE_COLOR: &str = "#3b82f6";
const CONVERSIONS_COLOR: &str = "#10b981";
const CLICKS_COLOR: &str = "#f59e0b";

/// Dashboard metrics use case
pub struct DashboardMetricsUseCase<R>
where
    R: MetricsRepository,
{
    repo: Arc<R>,
}

impl<R> DashboardMetricsUseCase<R>
where
    R: MetricsRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> AffiliateResult<DashboardMetrics> {
        self.repo.dashboard_metrics().await
    }
}

/// Chart data output
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub days: u32,
    pub daily: Vec<DailyStat>,
    pub series: Vec<ChartSeries>,
}

/// Chart data use case
pub struct ChartDataUseCase<R>
where
    R: MetricsRepository,
{
    repo: Arc<R>,
    config: Arc<AffiliateConfig>,
}

impl<R> ChartDataUseCase<R>
where
    R: MetricsRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AffiliateConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, days: Option<u32>) -> AffiliateResult<ChartData> {
        let days = self.config.chart_days(days);
        let daily = self.repo.chart_data(days).await?;

        let series = vec![
            ChartSeries::from_daily("Receita", &daily, |d| d.value).with_color(REVENUE_COLOR),
            ChartSeries::from_daily("Conversões", &daily, |d| d.conversions)
                .with_color(CONVERSIONS_COLOR),
            ChartSeries::from_daily("Cliques", &daily, |d| d.clicks).with_color(CLICKS_COLOR),
        ];

        Ok(ChartData {
            days,
            daily,
            series,
        })
    }
}

/// Affiliate statistics use case
pub struct UserStatsUseCase<R>
where
    R: UserRepository + ConversionRepository + LinkRepository,
{
    repo: Arc<R>,
}

impl<R> UserStatsUseCase<R>
where
    R: UserRepository + ConversionRepository + LinkRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AffiliateResult<UserStats> {
        if UserRepository::find_by_id(self.repo.as_ref(), user_id)
            .await?
            .is_none()
        {
            return Err(AffiliateError::UserNotFound);
        }

        let filter = ConversionFilter {
            affiliate_id: Some(user_id.clone()),
            ..Default::default()
        };
        let conversions = ConversionRepository::list(self.repo.as_ref(), &filter).await?;
        let links = self.repo.list_by_affiliate(user_id).await?;

        let stats = UserStats::from_activity(&conversions, &links);

        tracing::debug!(
            user_id = %user_id,
            conversions = stats.total_conversions,
            clicks = stats.total_clicks,
            "User stats computed"
        );

        Ok(stats)
    }
}
