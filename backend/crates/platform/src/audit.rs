//! Security audit events
//!
//! Events are emitted as structured `tracing` records so that any subscriber
//! (console, JSON, log shipper) can pick them up.

use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::config::{Environment, SecurityConfig};

/// Severity of a security event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl SecurityLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A security-relevant occurrence (failed login, blocked URL, rate limit hit)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityEvent {
    pub event: String,
    pub level: SecurityLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl SecurityEvent {
    pub fn new(event: impl Into<String>, level: SecurityLevel) -> Self {
        Self {
            event: event.into(),
            level,
            ip: None,
            user_id: None,
            user_agent: None,
            details: None,
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Whether an event passes the audit filter for this configuration
///
/// High and critical events are always recorded.
pub fn should_log(level: SecurityLevel, config: &SecurityConfig) -> bool {
    config.audit_logging || level >= SecurityLevel::High
}

/// Record a security event
///
/// Development logs everything that passes the filter at `warn`. Other
/// environments log high/critical at `error` and the rest at `warn`.
/// Returns whether the event was emitted.
pub fn log_security_event(event: &SecurityEvent, config: &SecurityConfig) -> bool {
    if !should_log(event.level, config) {
        return false;
    }

    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let details = event.details.as_ref().map(|d| d.to_string());

    let as_error =
        config.environment != Environment::Development && event.level >= SecurityLevel::High;

    if as_error {
        tracing::error!(
            timestamp = %timestamp,
            event = %event.event,
            level = %event.level,
            ip = event.ip.as_deref(),
            user_id = event.user_id.as_deref(),
            user_agent = event.user_agent.as_deref(),
            details = details.as_deref(),
            "Security event"
        );
    } else {
        tracing::warn!(
            timestamp = %timestamp,
            event = %event.event,
            level = %event.level,
            ip = event.ip.as_deref(),
            user_id = event.user_id.as_deref(),
            user_agent = event.user_agent.as_deref(),
            details = details.as_deref(),
            "Security event"
        );
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(SecurityLevel::Low < SecurityLevel::Medium);
        assert!(SecurityLevel::High < SecurityLevel::Critical);
    }

    #[test]
    fn test_filter_respects_audit_switch() {
        let dev = SecurityConfig::development();
        assert!(!should_log(SecurityLevel::Low, &dev));
        assert!(!should_log(SecurityLevel::Medium, &dev));
        assert!(should_log(SecurityLevel::High, &dev));
        assert!(should_log(SecurityLevel::Critical, &dev));

        let prod = SecurityConfig::production();
        assert!(should_log(SecurityLevel::Low, &prod));
    }

    #[test]
    fn test_log_returns_whether_emitted() {
        let event = SecurityEvent::new("login_failed", SecurityLevel::Medium).with_ip("203.0.113.7");
        assert!(!log_security_event(&event, &SecurityConfig::development()));
        assert!(log_security_event(&event, &SecurityConfig::production()));
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let event = SecurityEvent::new("ssrf_blocked", SecurityLevel::High)
            .with_user_id("user_2")
            .with_user_agent("curl/8.0")
            .with_details(serde_json::json!({ "url": "http://127.0.0.1/" }));

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "event": "ssrf_blocked",
                "level": "high",
                "userId": "user_2",
                "userAgent": "curl/8.0",
                "details": { "url": "http://127.0.0.1/" }
            })
        );
    }
}
