//! In-memory Repository Implementation
//!
//! `MockDataProvider` serves the dashboard fixtures and simulates API
//! latency. State lives behind `Arc<RwLock<..>>`, so clones share data.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use kernel::id::{CampaignId, ConversionId, LinkId, UserId};
use rand::Rng;
use tokio::sync::RwLock;

use crate::domain::entity::{
    AffiliateLink, Campaign, CampaignDraft, CampaignPatch, Conversion, DailyStat,
    DashboardMetrics, PaymentMethod, ProfileDetails, ProfileUpdate, User, UserPreferences,
    UserProfile, UserStats,
};
use crate::domain::filter::{CampaignFilter, ConversionFilter};
use crate::domain::repository::{
    CampaignRepository, ConversionRepository, LinkRepository, MetricsRepository, UserRepository,
};
use crate::domain::value_object::Email;
use crate::error::AffiliateResult;
use crate::infra::fixtures;

/// Simulated latency bounds in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }
}

/// Per-operation latency table
pub mod latency {
    use super::DelayRange;

    pub const GET_USER: DelayRange = DelayRange::new(300, 800);
    pub const LIST_USERS: DelayRange = DelayRange::new(400, 1000);
    pub const LIST_CAMPAIGNS: DelayRange = DelayRange::new(500, 1200);
    pub const GET_CAMPAIGN: DelayRange = DelayRange::new(300, 700);
    pub const LIST_CONVERSIONS: DelayRange = DelayRange::new(600, 1400);
    pub const GET_CONVERSION: DelayRange = DelayRange::new(300, 700);
    pub const SAVE_CONVERSION: DelayRange = DelayRange::new(300, 700);
    pub const LIST_LINKS: DelayRange = DelayRange::new(400, 900);
    pub const GET_LINK: DelayRange = DelayRange::new(300, 700);
    pub const DASHBOARD_METRICS: DelayRange = DelayRange::new(800, 1500);
    pub const CREATE_CAMPAIGN: DelayRange = DelayRange::new(1000, 2000);
    pub const UPDATE_CAMPAIGN: DelayRange = DelayRange::new(800, 1500);
    pub const DELETE_CAMPAIGN: DelayRange = DelayRange::new(500, 1000);
    pub const UPDATE_PROFILE: DelayRange = DelayRange::new(800, 1500);
}

/// Scale applied to every simulated delay
///
/// `0.0` disables latency (tests), `1.0` reproduces the table as is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkDelay {
    scale: f64,
}

impl Default for NetworkDelay {
    fn default() -> Self {
        Self::realistic()
    }
}

impl NetworkDelay {
    pub const fn disabled() -> Self {
        Self { scale: 0.0 }
    }

    pub const fn realistic() -> Self {
        Self { scale: 1.0 }
    }

    /// Negative and NaN scales disable the delay
    pub fn scaled(scale: f64) -> Self {
        Self {
            scale: if scale.is_finite() { scale.max(0.0) } else { 0.0 },
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.scale > 0.0
    }

    /// Draw a delay uniformly from `range`, then scale it
    pub fn sample(&self, range: DelayRange) -> Duration {
        if !self.is_enabled() {
            return Duration::ZERO;
        }
        let (lo, hi) = (range.min_ms.min(range.max_ms), range.min_ms.max(range.max_ms));
        let ms = rand::thread_rng().gen_range(lo..=hi) as f64 * self.scale;
        Duration::from_secs_f64(ms / 1000.0)
    }

    pub async fn simulate(&self, range: DelayRange) {
        let delay = self.sample(range);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    users: Vec<User>,
    profiles: HashMap<UserId, ProfileDetails>,
    payment_methods: Vec<PaymentMethod>,
    campaigns: Vec<Campaign>,
    conversions: Vec<Conversion>,
    links: Vec<AffiliateLink>,
    metrics: Option<DashboardMetrics>,
}

impl MockState {
    fn seeded() -> Self {
        Self {
            users: fixtures::users(),
            profiles: HashMap::new(),
            payment_methods: fixtures::payment_methods(),
            campaigns: fixtures::campaigns(),
            conversions: fixtures::conversions(),
            links: fixtures::links(),
            metrics: Some(fixtures::dashboard_metrics()),
        }
    }

    fn profile_of(&self, user: &User) -> UserProfile {
        let conversions: Vec<Conversion> = self
            .conversions
            .iter()
            .filter(|c| c.affiliate_id == user.id)
            .cloned()
            .collect();
        let links: Vec<AffiliateLink> = self
            .links
            .iter()
            .filter(|l| l.affiliate_id == user.id)
            .cloned()
            .collect();

        UserProfile {
            user: user.clone(),
            details: self.profiles.get(&user.id).cloned().unwrap_or_default(),
            payment_methods: self
                .payment_methods
                .iter()
                .filter(|m| m.user_id == user.id)
                .cloned()
                .collect(),
            preferences: UserPreferences {
                timezone: user
                    .timezone
                    .clone()
                    .unwrap_or_else(|| UserPreferences::default().timezone),
                ..UserPreferences::default()
            },
            stats: UserStats::from_activity(&conversions, &links),
        }
    }
}

/// In-memory data provider seeded with the dashboard fixtures
#[derive(Debug, Clone)]
pub struct MockDataProvider {
    state: Arc<RwLock<MockState>>,
    delay: NetworkDelay,
}

impl Default for MockDataProvider {
    fn default() -> Self {
        Self::new(NetworkDelay::default())
    }
}

impl MockDataProvider {
    /// Provider seeded with fixtures
    pub fn new(delay: NetworkDelay) -> Self {
        Self {
            state: Arc::new(RwLock::new(MockState::seeded())),
            delay,
        }
    }

    /// Provider without any data
    pub fn empty(delay: NetworkDelay) -> Self {
        Self {
            state: Arc::new(RwLock::new(MockState::default())),
            delay,
        }
    }

    pub fn delay(&self) -> NetworkDelay {
        self.delay
    }
}

/// Random daily analytics ending at `today`, oldest first
///
/// value in 5000..=14999, conversions in 50..=149, clicks in 500..=1499.
pub fn generate_chart_data_until(days: u32, today: NaiveDate) -> Vec<DailyStat> {
    let mut rng = rand::thread_rng();
    (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(chrono::Days::new(u64::from(offset))))
        .map(|date| DailyStat {
            date,
            value: rng.gen_range(5_000..15_000),
            conversions: rng.gen_range(50..150),
            clicks: rng.gen_range(500..1_500),
        })
        .collect()
}

/// [`generate_chart_data_until`] ending today (UTC)
pub fn generate_chart_data(days: u32) -> Vec<DailyStat> {
    generate_chart_data_until(days, Utc::now().date_naive())
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for MockDataProvider {
    async fn find_by_id(&self, id: &UserId) -> AffiliateResult<Option<User>> {
        self.delay.simulate(latency::GET_USER).await;
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| &u.id == id).cloned())
    }

    async fn list(&self) -> AffiliateResult<Vec<User>> {
        self.delay.simulate(latency::LIST_USERS).await;
        Ok(self.state.read().await.users.clone())
    }

    async fn exists_by_email(&self, email: &Email) -> AffiliateResult<bool> {
        self.delay.simulate(latency::GET_USER).await;
        let state = self.state.read().await;
        Ok(state.users.iter().any(|u| &u.email == email))
    }

    async fn find_profile(&self, id: &UserId) -> AffiliateResult<Option<UserProfile>> {
        self.delay.simulate(latency::GET_USER).await;
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|u| &u.id == id)
            .map(|user| state.profile_of(user)))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> AffiliateResult<Option<UserProfile>> {
        self.delay.simulate(latency::UPDATE_PROFILE).await;
        let mut state = self.state.write().await;

        let Some(user) = state.users.iter_mut().find(|u| &u.id == id) else {
            return Ok(None);
        };
        user.apply_profile(update, Utc::now());
        let user = user.clone();

        state.profiles.entry(id.clone()).or_default().apply(update);

        tracing::info!(user_id = %id, "Profile updated");
        Ok(Some(state.profile_of(&user)))
    }
}

// ============================================================================
// Campaign Repository Implementation
// ============================================================================

impl CampaignRepository for MockDataProvider {
    async fn list(&self, filter: &CampaignFilter) -> AffiliateResult<Vec<Campaign>> {
        self.delay.simulate(latency::LIST_CAMPAIGNS).await;
        let state = self.state.read().await;
        Ok(filter.apply(state.campaigns.iter().cloned()))
    }

    async fn find_by_id(&self, id: &CampaignId) -> AffiliateResult<Option<Campaign>> {
        self.delay.simulate(latency::GET_CAMPAIGN).await;
        let state = self.state.read().await;
        Ok(state.campaigns.iter().find(|c| &c.id == id).cloned())
    }

    async fn create(&self, draft: CampaignDraft) -> AffiliateResult<Campaign> {
        self.delay.simulate(latency::CREATE_CAMPAIGN).await;
        let campaign = Campaign::from_draft(CampaignId::generate(), draft, Utc::now());

        self.state.write().await.campaigns.push(campaign.clone());

        tracing::info!(
            campaign_id = %campaign.id,
            created_by = %campaign.created_by,
            "Campaign created"
        );
        Ok(campaign)
    }

    async fn update(
        &self,
        id: &CampaignId,
        patch: CampaignPatch,
    ) -> AffiliateResult<Option<Campaign>> {
        self.delay.simulate(latency::UPDATE_CAMPAIGN).await;
        let mut state = self.state.write().await;

        let Some(campaign) = state.campaigns.iter_mut().find(|c| &c.id == id) else {
            return Ok(None);
        };
        campaign.apply_patch(patch, Utc::now());

        tracing::info!(campaign_id = %id, "Campaign updated");
        Ok(Some(campaign.clone()))
    }

    async fn delete(&self, id: &CampaignId) -> AffiliateResult<bool> {
        self.delay.simulate(latency::DELETE_CAMPAIGN).await;
        let mut state = self.state.write().await;

        let Some(index) = state.campaigns.iter().position(|c| &c.id == id) else {
            return Ok(false);
        };
        state.campaigns.remove(index);

        tracing::info!(campaign_id = %id, "Campaign deleted");
        Ok(true)
    }
}

// ============================================================================
// Conversion Repository Implementation
// ============================================================================

impl ConversionRepository for MockDataProvider {
    async fn list(&self, filter: &ConversionFilter) -> AffiliateResult<Vec<Conversion>> {
        self.delay.simulate(latency::LIST_CONVERSIONS).await;
        let state = self.state.read().await;
        Ok(filter.apply(state.conversions.iter().cloned()))
    }

    async fn find_by_id(&self, id: &ConversionId) -> AffiliateResult<Option<Conversion>> {
        self.delay.simulate(latency::GET_CONVERSION).await;
        let state = self.state.read().await;
        Ok(state.conversions.iter().find(|c| &c.id == id).cloned())
    }

    async fn save(&self, conversion: Conversion) -> AffiliateResult<()> {
        self.delay.simulate(latency::SAVE_CONVERSION).await;
        let mut state = self.state.write().await;

        match state.conversions.iter_mut().find(|c| c.id == conversion.id) {
            Some(existing) => *existing = conversion,
            None => state.conversions.push(conversion),
        }
        Ok(())
    }
}

// ============================================================================
// Link Repository Implementation
// ============================================================================

impl LinkRepository for MockDataProvider {
    async fn list_by_affiliate(&self, affiliate_id: &UserId) -> AffiliateResult<Vec<AffiliateLink>> {
        self.delay.simulate(latency::LIST_LINKS).await;
        let state = self.state.read().await;
        Ok(state
            .links
            .iter()
            .filter(|l| &l.affiliate_id == affiliate_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &LinkId) -> AffiliateResult<Option<AffiliateLink>> {
        self.delay.simulate(latency::GET_LINK).await;
        let state = self.state.read().await;
        Ok(state.links.iter().find(|l| &l.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AffiliateResult<Option<AffiliateLink>> {
        self.delay.simulate(latency::GET_LINK).await;
        let state = self.state.read().await;
        Ok(state
            .links
            .iter()
            .find(|l| l.slug.as_deref() == Some(slug))
            .cloned())
    }

    async fn record_click(
        &self,
        id: &LinkId,
        unique: bool,
    ) -> AffiliateResult<Option<AffiliateLink>> {
        let mut state = self.state.write().await;
        let Some(link) = state.links.iter_mut().find(|l| &l.id == id) else {
            return Ok(None);
        };
        link.record_click(unique, Utc::now());
        Ok(Some(link.clone()))
    }
}

// ============================================================================
// Metrics Repository Implementation
// ============================================================================

impl MetricsRepository for MockDataProvider {
    async fn dashboard_metrics(&self) -> AffiliateResult<DashboardMetrics> {
        self.delay.simulate(latency::DASHBOARD_METRICS).await;
        let state = self.state.read().await;
        Ok(state.metrics.clone().unwrap_or_else(empty_metrics))
    }

    async fn chart_data(&self, days: u32) -> AffiliateResult<Vec<DailyStat>> {
        Ok(generate_chart_data(days))
    }
}

fn empty_metrics() -> DashboardMetrics {
    let now = Utc::now();
    DashboardMetrics {
        period: crate::domain::entity::MetricsPeriod { start: now, end: now },
        total_revenue: 0.0,
        total_commissions: 0.0,
        total_clicks: 0,
        total_conversions: 0,
        conversion_rate: 0.0,
        click_through_rate: 0.0,
        average_order_value: 0.0,
        earnings_per_click: 0.0,
        growth: Default::default(),
        top_campaigns: Vec::new(),
        top_affiliates: Vec::new(),
        top_countries: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{CampaignStatus, ConversionStatus};

    fn provider() -> MockDataProvider {
        MockDataProvider::new(NetworkDelay::disabled())
    }

    #[test]
    fn test_delay_sampling() {
        assert_eq!(NetworkDelay::disabled().sample(latency::GET_USER), Duration::ZERO);
        assert!(!NetworkDelay::scaled(-1.0).is_enabled());
        assert!(!NetworkDelay::scaled(f64::NAN).is_enabled());

        for _ in 0..50 {
            let d = NetworkDelay::realistic().sample(latency::GET_USER);
            assert!(d >= Duration::from_millis(300) && d <= Duration::from_millis(800));

            let half = NetworkDelay::scaled(0.5).sample(latency::CREATE_CAMPAIGN);
            assert!(half >= Duration::from_millis(500) && half <= Duration::from_millis(1000));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_delay_waits() {
        let start = tokio::time::Instant::now();
        NetworkDelay::realistic().simulate(latency::GET_CAMPAIGN).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(300));
    }

    #[test]
    fn test_generate_chart_data() {
        let today = NaiveDate::from_ymd_opt(2024, 8, 24).unwrap();
        let data = generate_chart_data_until(30, today);

        assert_eq!(data.len(), 30);
        assert_eq!(data.first().unwrap().date, NaiveDate::from_ymd_opt(2024, 7, 26).unwrap());
        assert_eq!(data.last().unwrap().date, today);
        assert!(data.windows(2).all(|w| w[0].date < w[1].date));
        assert!(data.iter().all(|d| (5_000..15_000).contains(&d.value)));
        assert!(data.iter().all(|d| (50..150).contains(&d.conversions)));
        assert!(data.iter().all(|d| (500..1_500).contains(&d.clicks)));

        assert!(generate_chart_data_until(0, today).is_empty());
        assert_eq!(generate_chart_data(7).len(), 7);
    }

    #[tokio::test]
    async fn test_seeded_fixtures() {
        let p = provider();
        assert_eq!(UserRepository::list(&p).await.unwrap().len(), 3);
        assert_eq!(
            CampaignRepository::list(&p, &CampaignFilter::default())
                .await
                .unwrap()
                .len(),
            3
        );
        assert_eq!(
            ConversionRepository::list(&p, &ConversionFilter::default())
                .await
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            p.list_by_affiliate(&UserId::from_suffix(2)).await.unwrap().len(),
            2
        );
        assert_eq!(p.dashboard_metrics().await.unwrap().total_conversions, 1_856);
    }

    #[tokio::test]
    async fn test_empty_provider() {
        let p = MockDataProvider::empty(NetworkDelay::disabled());
        assert!(UserRepository::list(&p).await.unwrap().is_empty());
        assert_eq!(p.dashboard_metrics().await.unwrap().total_revenue, 0.0);
    }

    #[tokio::test]
    async fn test_user_lookup() {
        let p = provider();
        let user = UserRepository::find_by_id(&p, &UserId::from_suffix(2))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.name, "João Silva");
        assert!(
            UserRepository::find_by_id(&p, &UserId::from_suffix(99))
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            p.exists_by_email(&Email::new("ADMIN@vibe.com").unwrap())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let p = provider();
        let clone = p.clone();

        let created = clone.create(CampaignDraft::default()).await.unwrap();
        assert!(created.id.as_str().starts_with("camp_"));

        let found = CampaignRepository::find_by_id(&p, &created.id).await.unwrap();
        assert_eq!(found.map(|c| c.name), Some("Nova Campanha".to_string()));
    }

    #[tokio::test]
    async fn test_update_and_delete_campaign() {
        let p = provider();
        let id = CampaignId::from_suffix(3);

        let updated = p
            .update(
                &id,
                CampaignPatch {
                    status: Some(CampaignStatus::Active),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, CampaignStatus::Active);
        assert!(updated.updated_at > updated.created_at);

        assert!(
            p.update(&CampaignId::from_suffix(42), CampaignPatch::default())
                .await
                .unwrap()
                .is_none()
        );

        assert!(p.delete(&id).await.unwrap());
        assert!(!p.delete(&id).await.unwrap());
        assert_eq!(
            CampaignRepository::list(&p, &CampaignFilter::default())
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn test_save_conversion_upserts() {
        let p = provider();
        let mut conversion = ConversionRepository::list(&p, &ConversionFilter::default())
            .await
            .unwrap()
            .remove(1);
        conversion.status = ConversionStatus::Approved;
        p.save(conversion.clone()).await.unwrap();

        let all = ConversionRepository::list(&p, &ConversionFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].status, ConversionStatus::Approved);

        conversion.id = ConversionId::from_suffix(3);
        p.save(conversion).await.unwrap();
        assert_eq!(
            ConversionRepository::list(&p, &ConversionFilter::default())
                .await
                .unwrap()
                .len(),
            3
        );
    }

    #[tokio::test]
    async fn test_links_by_slug_and_click() {
        let p = provider();
        let link = p.find_by_slug("bf2024").await.unwrap().unwrap();
        assert_eq!(link.id.as_str(), "link_1");
        assert!(p.find_by_slug("missing").await.unwrap().is_none());

        let clicked = p.record_click(&link.id, true).await.unwrap().unwrap();
        assert_eq!(clicked.clicks, link.clicks + 1);
        assert_eq!(clicked.unique_clicks, link.unique_clicks + 1);
        assert!(
            p.record_click(&LinkId::from_suffix(9), false)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_profile_update() {
        let p = provider();
        let id = UserId::from_suffix(2);

        let profile = p.find_profile(&id).await.unwrap().unwrap();
        assert_eq!(profile.payment_methods.len(), 1);
        assert_eq!(profile.stats.total_conversions, 2);
        assert_eq!(profile.preferences.currency, "BRL");

        let update = ProfileUpdate {
            name: "João P. Silva".to_string(),
            bio: Some("Criador de conteúdo".to_string()),
            website: None,
            company: None,
            phone: None,
            country: Some("PT".to_string()),
        };
        let updated = p.update_profile(&id, &update).await.unwrap().unwrap();
        assert_eq!(updated.user.name, "João P. Silva");
        assert_eq!(updated.user.country.as_deref(), Some("PT"));
        assert_eq!(updated.user.phone.as_deref(), Some("+55 11 88888-8888"));
        assert_eq!(updated.details.bio.as_deref(), Some("Criador de conteúdo"));

        assert!(
            p.update_profile(&UserId::from_suffix(9), &update)
                .await
                .unwrap()
                .is_none()
        );
    }
}
