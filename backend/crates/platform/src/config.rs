//! Environment-specific security configuration

use std::fmt;
use std::str::FromStr;

/// Environment variable selecting the runtime environment
pub const APP_ENV_VAR: &str = "APP_ENV";

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    /// Read [`APP_ENV_VAR`], falling back to development when unset or unknown
    pub fn from_env() -> Self {
        std::env::var(APP_ENV_VAR)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }

    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized environment name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment: {0}")]
pub struct UnknownEnvironment(pub String);

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(UnknownEnvironment(other.to_string())),
        }
    }
}

/// Security switches that differ per environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityConfig {
    pub environment: Environment,
    /// Enforce per-client request limits in the headers middleware
    pub rate_limit_enabled: bool,
    /// Drop `'unsafe-inline'`/`'unsafe-eval'` from `script-src`
    pub strict_csp: bool,
    /// Emit low/medium security events as well as high/critical ones
    pub audit_logging: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl SecurityConfig {
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            rate_limit_enabled: false,
            strict_csp: false,
            audit_logging: false,
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            rate_limit_enabled: true,
            strict_csp: true,
            audit_logging: true,
        }
    }

    pub fn for_env(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Development | Environment::Test => Self {
                environment,
                ..Self::development()
            },
        }
    }

    pub fn from_env() -> Self {
        Self::for_env(Environment::from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_environment_names() {
        assert_eq!("production".parse(), Ok(Environment::Production));
        assert_eq!(" PROD ".parse(), Ok(Environment::Production));
        assert_eq!("test".parse(), Ok(Environment::Test));
        assert_eq!("dev".parse(), Ok(Environment::Development));
        assert_eq!(
            "staging".parse::<Environment>(),
            Err(UnknownEnvironment("staging".to_string()))
        );
    }

    #[test]
    fn test_development_is_relaxed() {
        let config = SecurityConfig::for_env(Environment::Development);
        assert!(!config.rate_limit_enabled);
        assert!(!config.strict_csp);
        assert!(!config.audit_logging);
        assert_eq!(config, SecurityConfig::default());
    }

    #[test]
    fn test_production_is_strict() {
        let config = SecurityConfig::for_env(Environment::Production);
        assert!(config.rate_limit_enabled);
        assert!(config.strict_csp);
        assert!(config.audit_logging);
        assert!(config.environment.is_production());
    }

    #[test]
    fn test_env_mirrors_development() {
        let config = SecurityConfig::for_env(Environment::Test);
        assert_eq!(config.environment, Environment::Test);
        assert!(!config.rate_limit_enabled);
        assert!(!config.strict_csp);
    }
}
