//! Application Configuration
//!
//! Configuration for the affiliate application layer.

use platform::upload::UploadPolicy;

/// Affiliate application configuration
#[derive(Debug, Clone)]
pub struct AffiliateConfig {
    /// Shared secret for webhook HMAC signatures; `None` accepts unsigned webhooks
    pub webhook_secret: Option<String>,
    /// Domains redirects may target; empty allows any public host
    pub allowed_redirect_domains: Vec<String>,
    /// Limits for creative uploads
    pub upload_policy: UploadPolicy,
    /// Page size when the client sends none
    pub default_page_size: u32,
    /// Upper bound for client-supplied page sizes
    pub max_page_size: u32,
    /// Days of chart data when the client sends none
    pub default_chart_days: u32,
    /// Upper bound for chart windows
    pub max_chart_days: u32,
    /// Whether mutating dashboard routes require the CSRF double-submit pair
    pub csrf_required: bool,
    /// Whether to require Secure cookies
    pub cookie_secure: bool,
}

impl Default for AffiliateConfig {
    fn default() -> Self {
        Self {
            webhook_secret: None,
            allowed_redirect_domains: Vec::new(),
            upload_policy: UploadPolicy::default(),
            default_page_size: 10,
            max_page_size: 100,
            default_chart_days: 30,
            max_chart_days: 365,
            csrf_required: true,
            cookie_secure: true,
        }
    }
}

impl AffiliateConfig {
    /// Create config for development (no CSRF check, insecure cookies)
    pub fn development() -> Self {
        Self {
            csrf_required: false,
            cookie_secure: false,
            ..Default::default()
        }
    }

    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        self.webhook_secret = (!secret.is_empty()).then_some(secret);
        self
    }

    pub fn with_allowed_redirect_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_redirect_domains = domains;
        self
    }

    /// Get webhook secret as bytes
    pub fn webhook_key(&self) -> Option<&[u8]> {
        self.webhook_secret.as_deref().map(str::as_bytes)
    }

    /// Clamp a requested chart window to `1..=max_chart_days`
    pub fn chart_days(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_chart_days)
            .clamp(1, self.max_chart_days.max(1))
    }
}
