//! Presentation Layer
//!
//! HTTP handlers, DTOs, response envelope, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;

pub use handlers::{AffiliateAppState, REFERRAL_COOKIE};
pub use middleware::{Client, require_csrf};
pub use response::{ApiResponse, PaginationMeta};
pub use router::{affiliate_router, affiliate_router_generic};
