//! Domain Layer
//!
//! Contains entities, value objects, filters, and repository traits.

pub mod entity;
pub mod filter;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{AffiliateLink, Campaign, Conversion, DashboardMetrics, User};
pub use filter::{CampaignFilter, ConversionFilter};
pub use repository::{
    CampaignRepository, ConversionRepository, DashboardRepository, LinkRepository,
    MetricsRepository, UserRepository,
};
