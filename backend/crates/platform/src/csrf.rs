//! CSRF tokens (double-submit cookie)
//!
//! The token is issued in a readable cookie; state-changing requests echo it
//! back in the [`CSRF_HEADER`] header and both values must match.

use axum::http::HeaderMap;

use crate::cookie::{CookieConfig, SameSite, extract_cookie};
use crate::crypto::{constant_time_eq, generate_secure_token};

/// Length of generated CSRF tokens
pub const CSRF_TOKEN_LENGTH: usize = 40;

/// Cookie carrying the CSRF token
pub const CSRF_COOKIE: &str = "csrf_token";

/// Header the client echoes the token in
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Generate a new CSRF token
pub fn generate_csrf_token() -> String {
    generate_secure_token(CSRF_TOKEN_LENGTH)
}

/// Compare a submitted token with the expected one
///
/// Empty values never validate. Comparison is constant-time.
pub fn validate_csrf_token(token: &str, expected: &str) -> bool {
    if token.is_empty() || expected.is_empty() {
        return false;
    }
    constant_time_eq(token.as_bytes(), expected.as_bytes())
}

/// Cookie settings for the CSRF token
///
/// Not `HttpOnly`: the dashboard script must read it to echo it back.
pub fn csrf_cookie_config(secure: bool) -> CookieConfig {
    CookieConfig::new(CSRF_COOKIE)
        .secure(secure)
        .http_only(false)
        .same_site(SameSite::Strict)
        .max_age(2 * 3600)
}

/// Check the double-submit pair carried by a request
pub fn verify_double_submit(headers: &HeaderMap) -> bool {
    let submitted = headers
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    match extract_cookie(headers, CSRF_COOKIE) {
        Some(expected) => validate_csrf_token(submitted, &expected),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};

    #[test]
    fn test_token_has_expected_shape() {
        let token = generate_csrf_token();
        assert_eq!(token.len(), CSRF_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_validate_requires_both_non_empty() {
        assert!(!validate_csrf_token("", ""));
        assert!(!validate_csrf_token("abc", ""));
        assert!(!validate_csrf_token("", "abc"));
    }

    #[test]
    fn test_validate_compares_exactly() {
        let token = generate_csrf_token();
        assert!(validate_csrf_token(&token, &token.clone()));
        assert!(!validate_csrf_token(&token, &generate_csrf_token()));
        assert!(!validate_csrf_token("abc", "ABC"));
    }

    #[test]
    fn test_double_submit_pair() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; csrf_token=tok123"));
        assert!(!verify_double_submit(&headers));

        headers.insert(CSRF_HEADER, HeaderValue::from_static("tok123"));
        assert!(verify_double_submit(&headers));

        headers.insert(CSRF_HEADER, HeaderValue::from_static("tok124"));
        assert!(!verify_double_submit(&headers));
    }

    #[test]
    fn test_cookie_is_script_readable() {
        let cookie = csrf_cookie_config(true).build_set_cookie("tok");
        assert!(cookie.starts_with("csrf_token=tok"));
        assert!(!cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Secure"));
    }
}
