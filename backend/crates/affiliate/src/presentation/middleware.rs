//! Affiliate Middleware and Extractors

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{ConnectInfo, FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{Method, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::client::client_ip;
use platform::csrf::verify_double_submit;

use crate::application::config::AffiliateConfig;
use crate::application::tracking::ClientContext;
use crate::error::AffiliateError;

/// Caller address and user agent
///
/// The address comes from proxy headers first, then the socket peer when
/// the server runs with connect info.
pub struct Client(pub ClientContext);

impl<S> FromRequestParts<S> for Client
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(Self(ClientContext {
            ip: client_ip(&parts.headers, peer),
            user_agent,
        }))
    }
}

/// Middleware that enforces the CSRF double-submit check on mutating requests
///
/// Safe methods always pass; so does everything when the config disables
/// the check.
pub async fn require_csrf(
    State(config): State<Arc<AffiliateConfig>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let safe = matches!(*req.method(), Method::GET | Method::HEAD | Method::OPTIONS);

    if config.csrf_required && !safe && !verify_double_submit(req.headers()) {
        return AffiliateError::CsrfMismatch.into_response();
    }

    next.run(req).await
}
