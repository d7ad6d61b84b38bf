//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use affiliate::{MockDataProvider, affiliate_router};
use axum::{Json, Router, middleware, response::IntoResponse, routing::get};
use platform::headers::{SecurityHeadersState, security_headers};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ApiConfig;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,affiliate=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;
    tracing::info!(
        environment = %config.environment,
        mock_delay = config.delay.is_enabled(),
        csrf_required = config.affiliate.csrf_required,
        "Configuration loaded"
    );

    let app = build_app(config.clone());

    // Start server
    tracing::info!("Listening on {}", config.addr);

    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Assemble the full application router
fn build_app(config: ApiConfig) -> Router {
    let provider = MockDataProvider::new(config.delay);
    let headers = SecurityHeadersState::new(config.security.clone());

    Router::new()
        .route("/health", get(health))
        .nest(
            "/api/v1",
            affiliate_router(provider, config.affiliate, config.security),
        )
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(headers, security_headers))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "success": true, "status": "ok" }))
}

async fn not_found() -> AppError {
    AppError::not_found("Route not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use affiliate::{AffiliateConfig, NetworkDelay};
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use platform::config::{Environment, SecurityConfig};
    use tower::ServiceExt;

    fn app() -> Router {
        build_app(ApiConfig {
            environment: Environment::Test,
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            delay: NetworkDelay::disabled(),
            affiliate: AffiliateConfig::development(),
            security: SecurityConfig::for_env(Environment::Test),
        })
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_is_nested_with_security_headers() {
        let response = app()
            .oneshot(Request::get("/api/v1/campaigns").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-frame-options"], "DENY");
        assert_eq!(response.headers()["x-api-version"], "1.0");
        assert!(response.headers().contains_key("x-request-id"));
        assert!(!response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_tracking_preflight() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/v1/track")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let response = app()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "NOT_FOUND");
    }
}
