//! Affiliate Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use platform::config::SecurityConfig;
use std::sync::Arc;

use crate::application::config::AffiliateConfig;
use crate::domain::repository::DashboardRepository;
use crate::infra::memory::MockDataProvider;
use crate::presentation::handlers::{self, AffiliateAppState};
use crate::presentation::middleware::require_csrf;

/// Create the affiliate router backed by the in-memory provider
pub fn affiliate_router(
    provider: MockDataProvider,
    config: AffiliateConfig,
    security: SecurityConfig,
) -> Router {
    affiliate_router_generic(provider, config, security)
}

/// Create a generic affiliate router for any repository implementation
///
/// Dashboard routes sit behind the CSRF check; tracking routes
/// (`/track`, `/webhook`, `/redirect/{slug}`) are public.
pub fn affiliate_router_generic<R>(repo: R, config: AffiliateConfig, security: SecurityConfig) -> Router
where
    R: DashboardRepository,
{
    let state = AffiliateAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
        security: Arc::new(security),
    };

    let dashboard = Router::new()
        .route("/users", get(handlers::list_users::<R>))
        .route("/users/{id}", get(handlers::get_user::<R>))
        .route("/users/{id}/stats", get(handlers::user_stats::<R>))
        .route(
            "/users/{id}/profile",
            get(handlers::get_profile::<R>).patch(handlers::update_profile::<R>),
        )
        .route(
            "/campaigns",
            get(handlers::list_campaigns::<R>).post(handlers::create_campaign::<R>),
        )
        .route(
            "/campaigns/{id}",
            get(handlers::get_campaign::<R>)
                .patch(handlers::update_campaign::<R>)
                .delete(handlers::delete_campaign::<R>),
        )
        .route("/conversions", get(handlers::list_conversions::<R>))
        .route("/affiliates/{id}/links", get(handlers::affiliate_links::<R>))
        .route("/dashboard/metrics", get(handlers::dashboard_metrics::<R>))
        .route("/analytics/chart", get(handlers::analytics_chart::<R>))
        .route("/uploads/validate", post(handlers::validate_upload::<R>))
        .route("/csrf", get(handlers::csrf_token::<R>))
        .route("/auth/register", post(handlers::register::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.config.clone(),
            require_csrf,
        ));

    let public = Router::new()
        .route("/track", post(handlers::track_click::<R>))
        .route("/webhook", post(handlers::webhook::<R>))
        .route("/redirect/{slug}", get(handlers::redirect::<R>));

    dashboard.merge(public).with_state(state)
}
