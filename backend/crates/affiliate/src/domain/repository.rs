//! Repository Traits
//!
//! Interfaces for data access. The in-memory implementation lives in the
//! infrastructure layer.

use kernel::id::{CampaignId, ConversionId, LinkId, UserId};

use crate::domain::entity::{
    campaign::{Campaign, CampaignDraft, CampaignPatch},
    conversion::Conversion,
    link::AffiliateLink,
    metrics::{DailyStat, DashboardMetrics},
    user::{ProfileUpdate, User, UserProfile},
};
use crate::domain::filter::{CampaignFilter, ConversionFilter};
use crate::domain::value_object::email::Email;
use crate::error::AffiliateResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Find user by ID
    async fn find_by_id(&self, id: &UserId) -> AffiliateResult<Option<User>>;

    /// List all users
    async fn list(&self) -> AffiliateResult<Vec<User>>;

    /// Check if an email is registered
    async fn exists_by_email(&self, email: &Email) -> AffiliateResult<bool>;

    /// Full profile with payout methods and stats
    async fn find_profile(&self, id: &UserId) -> AffiliateResult<Option<UserProfile>>;

    /// Apply a profile update; `None` if the user does not exist
    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> AffiliateResult<Option<UserProfile>>;
}

/// Campaign repository trait
#[trait_variant::make(CampaignRepository: Send)]
pub trait LocalCampaignRepository {
    /// List campaigns matching the filter
    async fn list(&self, filter: &CampaignFilter) -> AffiliateResult<Vec<Campaign>>;

    /// Find campaign by ID
    async fn find_by_id(&self, id: &CampaignId) -> AffiliateResult<Option<Campaign>>;

    /// Create a campaign from a draft
    async fn create(&self, draft: CampaignDraft) -> AffiliateResult<Campaign>;

    /// Merge a patch; `None` if the campaign does not exist
    async fn update(&self, id: &CampaignId, patch: CampaignPatch)
    -> AffiliateResult<Option<Campaign>>;

    /// Delete a campaign; `true` if it existed
    async fn delete(&self, id: &CampaignId) -> AffiliateResult<bool>;
}

/// Conversion repository trait
#[trait_variant::make(ConversionRepository: Send)]
pub trait LocalConversionRepository {
    /// List conversions matching the filter
    async fn list(&self, filter: &ConversionFilter) -> AffiliateResult<Vec<Conversion>>;

    /// Find conversion by ID
    async fn find_by_id(&self, id: &ConversionId) -> AffiliateResult<Option<Conversion>>;

    /// Insert or replace a conversion by ID
    async fn save(&self, conversion: Conversion) -> AffiliateResult<()>;
}

/// Affiliate link repository trait
#[trait_variant::make(LinkRepository: Send)]
pub trait LocalLinkRepository {
    /// Links owned by an affiliate
    async fn list_by_affiliate(&self, affiliate_id: &UserId) -> AffiliateResult<Vec<AffiliateLink>>;

    /// Find link by ID
    async fn find_by_id(&self, id: &LinkId) -> AffiliateResult<Option<AffiliateLink>>;

    /// Find link by its short-URL slug
    async fn find_by_slug(&self, slug: &str) -> AffiliateResult<Option<AffiliateLink>>;

    /// Count a click; returns the updated link
    async fn record_click(&self, id: &LinkId, unique: bool)
    -> AffiliateResult<Option<AffiliateLink>>;
}

/// Analytics repository trait
#[trait_variant::make(MetricsRepository: Send)]
pub trait LocalMetricsRepository {
    /// Dashboard overview snapshot
    async fn dashboard_metrics(&self) -> AffiliateResult<DashboardMetrics>;

    /// Daily series ending today, oldest first
    async fn chart_data(&self, days: u32) -> AffiliateResult<Vec<DailyStat>>;
}

/// Every repository the dashboard routes need, behind one bound
pub trait DashboardRepository:
    UserRepository
    + CampaignRepository
    + ConversionRepository
    + LinkRepository
    + MetricsRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> DashboardRepository for T where
    T: UserRepository
        + CampaignRepository
        + ConversionRepository
        + LinkRepository
        + MetricsRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
