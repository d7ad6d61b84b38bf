//! Affiliate Dashboard Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, filters, repository traits
//! - `application/` - Use cases, input forms, configuration
//! - `infra/` - In-memory mock data provider and fixtures
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Users, campaigns, conversions, affiliate links and dashboard metrics
//! - Campaign CRUD with filtering, sorting and pagination
//! - Affiliate statistics and analytics chart data
//! - Public tracking endpoints: click tracking, link redirects, webhooks
//!
//! ## Security Model
//! - Free text is sanitized before it is stored
//! - Landing pages, websites and redirect targets pass the SSRF guard
//! - Webhooks are HMAC-SHA256 signed when a secret is configured
//! - Mutating dashboard routes use the CSRF double-submit check

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AffiliateConfig;
pub use error::{AffiliateError, AffiliateResult};
pub use infra::memory::{MockDataProvider, NetworkDelay};
pub use presentation::router::affiliate_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::filter::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
