//! Rate Limiting Infrastructure
//!
//! Key derivation, limits, and a fixed-window counter store. Limiting is only
//! switched on where [`crate::config::SecurityConfig::rate_limit_enabled`] says so.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Build the storage key for an identifier/action pair
///
/// `ratelimit:<action>:<identifier>`, e.g. `ratelimit:login:203.0.113.7`.
pub fn rate_limit_key(identifier: &str, action: &str) -> String {
    format!("ratelimit:{action}:{identifier}")
}

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

impl RateLimitResult {
    /// Seconds until the window resets, rounded up
    pub fn retry_after_secs(&self, now_ms: i64) -> u64 {
        let remaining_ms = (self.reset_at_ms - now_ms).max(0) as u64;
        remaining_ms.div_ceil(1000)
    }
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Check and increment the counter for `key`
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at_ms: i64,
    count: u32,
}

/// Entries kept before stale windows are first swept
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug)]
struct Windows {
    by_key: HashMap<String, Window>,
    /// Size at which the next sweep runs; doubles past live entries so a
    /// map full of in-window keys is not rescanned on every request
    sweep_at: usize,
}

impl Default for Windows {
    fn default() -> Self {
        Self {
            by_key: HashMap::new(),
            sweep_at: SWEEP_THRESHOLD,
        }
    }
}

impl Windows {
    fn sweep(&mut self, now_ms: i64, window_ms: i64) {
        self.by_key.retain(|_, w| now_ms - w.started_at_ms < window_ms);
        self.sweep_at = SWEEP_THRESHOLD.max(self.by_key.len() * 2);
    }
}

/// In-process fixed-window counters
#[derive(Debug, Clone, Default)]
pub struct MemoryRateLimitStore {
    windows: Arc<Mutex<Windows>>,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check and increment at an explicit clock reading
    pub fn check_at(&self, key: &str, config: &RateLimitConfig, now_ms: i64) -> RateLimitResult {
        let window_ms = config.window_ms();
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        if windows.by_key.len() >= windows.sweep_at {
            windows.sweep(now_ms, window_ms);
        }

        let window = windows.by_key.entry(key.to_string()).or_insert(Window {
            started_at_ms: now_ms,
            count: 0,
        });

        if now_ms - window.started_at_ms >= window_ms {
            *window = Window {
                started_at_ms: now_ms,
                count: 0,
            };
        }

        let reset_at_ms = window.started_at_ms + window_ms;

        if window.count >= config.max_requests {
            return RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_at_ms,
            };
        }

        window.count += 1;
        RateLimitResult {
            allowed: true,
            remaining: config.max_requests - window.count,
            reset_at_ms,
        }
    }
}

impl RateLimitStore for MemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.check_at(key, config, chrono::Utc::now().timestamp_millis()))
    }
}
