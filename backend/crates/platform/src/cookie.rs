//! Cookie helpers
//!
//! The dashboard sets two cookies of its own: the CSRF token and the
//! affiliate referral marker. Both are built with [`CookieConfig`].

use std::fmt::Write;

use axum::http::{HeaderMap, HeaderValue, header};

/// `SameSite` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes of a cookie the server sets
///
/// [`CookieConfig::new`] starts from `HttpOnly; Secure; SameSite=Lax; Path=/`
/// with no `Max-Age` (session cookie).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
}

impl CookieConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }

    /// `Secure` is dropped for plain-HTTP development servers
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Cookies read by dashboard scripts must not be `HttpOnly`
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn max_age(mut self, secs: i64) -> Self {
        self.max_age_secs = Some(secs);
        self
    }

    /// Render the `Set-Cookie` value
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut cookie = format!("{}={}", self.name, value);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        let _ = write!(cookie, "; SameSite={}; Path={}", self.same_site.as_str(), self.path);
        if let Some(max_age) = self.max_age_secs {
            let _ = write!(cookie, "; Max-Age={max_age}");
        }

        cookie
    }

    /// `Set-Cookie` as a header value
    ///
    /// Values with bytes that are not allowed in a header yield an empty value.
    pub fn header_value(&self, value: &str) -> HeaderValue {
        HeaderValue::from_str(&self.build_set_cookie(value))
            .unwrap_or_else(|_| HeaderValue::from_static(""))
    }
}

/// Read a cookie sent by the client
///
/// Looks through every `Cookie` header; the first pair named `name` wins.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(
            CookieConfig::new("aff_ref").build_set_cookie("link_1"),
            "aff_ref=link_1; HttpOnly; Secure; SameSite=Lax; Path=/"
        );
    }

    #[test]
    fn test_builder() {
        let config = CookieConfig::new("csrf_token")
            .secure(false)
            .http_only(false)
            .same_site(SameSite::Strict)
            .path("/api")
            .max_age(3600);

        assert_eq!(
            config.build_set_cookie("tok"),
            "csrf_token=tok; SameSite=Strict; Path=/api; Max-Age=3600"
        );
    }

    #[test]
    fn test_header_value_rejects_control_bytes() {
        let value = CookieConfig::new("x").header_value("a\nb");
        assert!(value.is_empty());
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; aff_ref=link_2; csrf_token=xyz"),
        );

        assert_eq!(extract_cookie(&headers, "aff_ref"), Some("link_2".to_string()));
        assert_eq!(extract_cookie(&headers, "csrf_token"), Some("xyz".to_string()));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_extract_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("b=2"));
        assert_eq!(extract_cookie(&headers, "b"), Some("2".to_string()));
    }
}
