//! Server configuration read from the environment

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use affiliate::{AffiliateConfig, NetworkDelay};
use anyhow::Context;
use platform::config::{Environment, SecurityConfig};

const DEFAULT_PORT: u16 = 31113;

/// Everything `main` needs to start the server
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub environment: Environment,
    pub addr: SocketAddr,
    pub delay: NetworkDelay,
    pub affiliate: AffiliateConfig,
    pub security: SecurityConfig,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup
    ///
    /// Recognized keys: `APP_ENV`, `HOST`, `PORT`, `MOCK_DELAY`,
    /// `WEBHOOK_SECRET`, `ALLOWED_REDIRECT_DOMAINS`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let environment: Environment = match lookup(platform::config::APP_ENV_VAR) {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid APP_ENV `{raw}`"))?,
            None => Environment::default(),
        };

        let host: IpAddr = match lookup("HOST") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid HOST `{raw}`"))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT `{raw}`"))?,
            None => DEFAULT_PORT,
        };

        let delay = match lookup("MOCK_DELAY").as_deref().map(str::trim) {
            None | Some("") => default_delay(environment),
            Some("off") | Some("false") => NetworkDelay::disabled(),
            Some("on") | Some("true") => NetworkDelay::realistic(),
            Some(raw) => NetworkDelay::scaled(
                raw.parse::<f64>()
                    .with_context(|| format!("invalid MOCK_DELAY `{raw}`"))?,
            ),
        };

        let base = if environment.is_production() {
            AffiliateConfig::default()
        } else {
            AffiliateConfig::development()
        };
        let mut affiliate = base.with_allowed_redirect_domains(
            lookup("ALLOWED_REDIRECT_DOMAINS")
                .unwrap_or_default()
                .split(',')
                .map(|d| d.trim().to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        );
        if let Some(secret) = lookup("WEBHOOK_SECRET") {
            affiliate = affiliate.with_webhook_secret(secret.trim());
        }

        if environment.is_production() && affiliate.webhook_secret.is_none() {
            tracing::warn!("WEBHOOK_SECRET is not set, webhooks are accepted unsigned");
        }

        Ok(Self {
            environment,
            addr: SocketAddr::new(host, port),
            delay,
            affiliate,
            security: SecurityConfig::for_env(environment),
        })
    }
}

/// Tests run without simulated latency
fn default_delay(environment: Environment) -> NetworkDelay {
    match environment {
        Environment::Test => NetworkDelay::disabled(),
        Environment::Development | Environment::Production => NetworkDelay::realistic(),
    }
}
