//! Security headers and CORS middleware
//!
//! Wraps every non-static request. Adds the browser hardening headers, API
//! cache and tracing headers, CORS for the public tracking endpoints, and
//! (when enabled) per-client rate limiting.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use kernel::AppError;

use crate::audit::{SecurityEvent, SecurityLevel, log_security_event};
use crate::client::client_ip;
use crate::config::SecurityConfig;
use crate::rate_limit::{MemoryRateLimitStore, RateLimitConfig, RateLimitStore, rate_limit_key};

const PERMISSIONS_POLICY: HeaderName = HeaderName::from_static("permissions-policy");
const X_API_VERSION: HeaderName = HeaderName::from_static("x-api-version");
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
const X_CLIENT_IP: HeaderName = HeaderName::from_static("x-client-ip");
const X_TIMESTAMP: HeaderName = HeaderName::from_static("x-timestamp");

pub const RELAXED_CSP: &str = "default-src 'self'; script-src 'self' 'unsafe-inline' 'unsafe-eval'; style-src 'self' 'unsafe-inline'; img-src 'self' data: blob:; font-src 'self' data:; connect-src 'self';";
pub const STRICT_CSP: &str = "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data: blob:; font-src 'self' data:; connect-src 'self';";

const HSTS: &str = "max-age=31536000; includeSubDomains; preload";
const API_VERSION: &str = "1.0";

/// Endpoints called from third-party sites (pixels, postbacks, redirects)
pub const PUBLIC_API_PREFIXES: &[&str] = &["/api/v1/track", "/api/v1/webhook", "/api/v1/redirect"];

const STATIC_PREFIXES: &[&str] = &["/_next/static", "/_next/image", "/favicon.ico", "/static/"];
const STATIC_EXTENSIONS: &[&str] = &[".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp"];

/// Shared state of the security headers middleware
#[derive(Debug, Clone)]
pub struct SecurityHeadersState {
    pub config: Arc<SecurityConfig>,
    pub limiter: MemoryRateLimitStore,
    pub limit: RateLimitConfig,
}

impl SecurityHeadersState {
    pub fn new(config: SecurityConfig) -> Self {
        Self {
            config: Arc::new(config),
            limiter: MemoryRateLimitStore::new(),
            limit: RateLimitConfig::default(),
        }
    }

    pub fn with_limit(mut self, limit: RateLimitConfig) -> Self {
        self.limit = limit;
        self
    }
}

/// Assets served without any header processing
pub fn is_static_path(path: &str) -> bool {
    STATIC_PREFIXES.iter().any(|p| path.starts_with(p))
        || STATIC_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

pub fn is_public_api(path: &str) -> bool {
    PUBLIC_API_PREFIXES.iter().any(|p| path.starts_with(p))
}

pub fn content_security_policy(config: &SecurityConfig) -> &'static str {
    if config.strict_csp { STRICT_CSP } else { RELAXED_CSP }
}

/// Security headers middleware
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn security_headers(
    State(state): State<SecurityHeadersState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    if is_static_path(&path) {
        return next.run(req).await;
    }

    let public = is_public_api(&path);

    if public && req.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        insert_cors_headers(response.headers_mut());
        response
            .headers_mut()
            .insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));
        return response;
    }

    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let client = client_ip(req.headers(), direct_ip);

    let limited = check_rate_limit(&state, &client, req.headers()).await;
    let mut response = match limited {
        Some(limited) => limited,
        None => next.run(req).await,
    };

    let headers = response.headers_mut();
    insert_security_headers(headers, &state.config);

    if path.starts_with("/api/") {
        insert_api_headers(headers);
    }

    if public {
        insert_cors_headers(headers);
    }

    headers.insert(
        X_CLIENT_IP,
        HeaderValue::from_str(&client).unwrap_or(HeaderValue::from_static("unknown")),
    );
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    if let Ok(value) = HeaderValue::from_str(&timestamp) {
        headers.insert(X_TIMESTAMP, value);
    }

    response
}

/// Returns the 429 response when the client is over its limit
async fn check_rate_limit(
    state: &SecurityHeadersState,
    client: &str,
    request_headers: &HeaderMap,
) -> Option<Response> {
    if !state.config.rate_limit_enabled {
        return None;
    }

    let key = rate_limit_key(client, "api");
    let result = match state.limiter.check_and_increment(&key, &state.limit).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "Rate limit check failed");
            return None;
        }
    };

    if result.allowed {
        return None;
    }

    let retry_after = result.retry_after_secs(Utc::now().timestamp_millis()).max(1);

    let mut event = SecurityEvent::new("rate_limit_exceeded", SecurityLevel::Medium).with_ip(client);
    if let Some(agent) = request_headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
    {
        event = event.with_user_agent(agent);
    }
    log_security_event(&event, &state.config);

    let mut response = AppError::too_many_requests("Too many requests")
        .with_action("Wait before retrying")
        .into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    Some(response)
}

fn insert_security_headers(headers: &mut HeaderMap, config: &SecurityConfig) {
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        PERMISSIONS_POLICY,
        HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
    );

    if config.environment.is_production() {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS),
        );
    }

    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(content_security_policy(config)),
    );
}

fn insert_api_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate"),
    );
    headers.insert(X_API_VERSION, HeaderValue::from_static(API_VERSION));
    if let Ok(id) = HeaderValue::from_str(&uuid::Uuid::new_v4().to_string()) {
        headers.insert(X_REQUEST_ID, id);
    }
}

fn insert_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
}
