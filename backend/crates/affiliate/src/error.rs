//! Affiliate Error Types
//!
//! This module provides affiliate-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::url_guard::UrlRejection;
use serde::Serialize;
use thiserror::Error;

use crate::domain::value_object::conversion_status::ConversionStatus;

/// Affiliate-specific result type alias
pub type AffiliateResult<T> = Result<T, AffiliateError>;

/// A single rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Affiliate-specific error variants
#[derive(Debug, Error)]
pub enum AffiliateError {
    #[error("User not found")]
    UserNotFound,

    #[error("Campaign not found")]
    CampaignNotFound,

    #[error("Conversion not found")]
    ConversionNotFound,

    #[error("Link not found")]
    LinkNotFound,

    /// Link exists but is disabled or past its expiry
    #[error("Link is no longer available")]
    LinkUnavailable,

    #[error("Email is already registered")]
    EmailTaken,

    /// Form validation failed; carries every rejected field
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// URL rejected by the SSRF guard
    #[error("Unsafe URL: {0}")]
    UnsafeUrl(#[from] UrlRejection),

    #[error("Invalid conversion status transition: {from} -> {to}")]
    InvalidTransition {
        from: ConversionStatus,
        to: ConversionStatus,
    },

    #[error("Missing webhook signature")]
    MissingSignature,

    #[error("Invalid webhook signature")]
    InvalidSignature,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("CSRF token missing or invalid")]
    CsrfMismatch,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AffiliateError {
    /// Single-field validation failure
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AffiliateError::UserNotFound
            | AffiliateError::CampaignNotFound
            | AffiliateError::ConversionNotFound
            | AffiliateError::LinkNotFound => ErrorKind::NotFound,
            AffiliateError::LinkUnavailable => ErrorKind::Gone,
            AffiliateError::EmailTaken => ErrorKind::Conflict,
            AffiliateError::Validation(_) | AffiliateError::InvalidTransition { .. } => {
                ErrorKind::UnprocessableEntity
            }
            AffiliateError::UnsafeUrl(_) | AffiliateError::InvalidPayload(_) => {
                ErrorKind::BadRequest
            }
            AffiliateError::MissingSignature | AffiliateError::InvalidSignature => {
                ErrorKind::Unauthorized
            }
            AffiliateError::CsrfMismatch => ErrorKind::Forbidden,
            AffiliateError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let error = AppError::new(self.kind(), self.to_string());
        match self {
            AffiliateError::Validation(fields) => error
                .with_details(serde_json::json!({ "fields": fields }))
                .with_action("Fix the highlighted fields and submit again"),
            AffiliateError::CsrfMismatch => {
                error.with_action("Request a new token from /api/v1/csrf")
            }
            // Internal details stay in the logs
            AffiliateError::Internal(_) => {
                AppError::new(self.kind(), "Internal server error")
            }
            _ => error,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AffiliateError::Internal(msg) => {
                tracing::error!(message = %msg, "Affiliate internal error");
            }
            AffiliateError::InvalidSignature | AffiliateError::MissingSignature => {
                tracing::warn!(error = %self, "Rejected webhook");
            }
            AffiliateError::UnsafeUrl(reason) => {
                tracing::warn!(reason = %reason, "Rejected unsafe URL");
            }
            AffiliateError::CsrfMismatch => {
                tracing::warn!("CSRF check failed");
            }
            _ => {
                tracing::debug!(error = %self, "Affiliate error");
            }
        }
    }
}

impl IntoResponse for AffiliateError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AffiliateError {
    fn from(err: AppError) -> Self {
        AffiliateError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AffiliateError {
    fn from(err: serde_json::Error) -> Self {
        AffiliateError::InvalidPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(AffiliateError::CampaignNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(AffiliateError::LinkUnavailable.kind(), ErrorKind::Gone);
        assert_eq!(AffiliateError::EmailTaken.kind(), ErrorKind::Conflict);
        assert_eq!(
            AffiliateError::invalid("name", "required").kind(),
            ErrorKind::UnprocessableEntity
        );
        assert_eq!(
            AffiliateError::UnsafeUrl(UrlRejection::PrivateHost).kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(AffiliateError::InvalidSignature.kind(), ErrorKind::Unauthorized);
        assert_eq!(AffiliateError::CsrfMismatch.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn test_validation_details() {
        let err = AffiliateError::Validation(vec![
            FieldError::new("name", "Name is required"),
            FieldError::new("budget", "Budget must not be negative"),
        ]);
        let envelope = err.to_app_error().to_envelope();

        assert_eq!(envelope["statusCode"], 422);
        assert_eq!(envelope["details"]["fields"][0]["field"], "name");
        assert_eq!(envelope["details"]["fields"][1]["message"], "Budget must not be negative");
    }

    #[test]
    fn test_internal_message_hidden() {
        let app = AffiliateError::Internal("lock poisoned".to_string()).to_app_error();
        assert_eq!(app.message(), "Internal server error");
        assert_eq!(app.status_code(), 500);
    }
}
