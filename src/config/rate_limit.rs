//! Rate limit and retry configuration types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rate limit handling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum attempts per request, counting the first one.
    pub max_attempts: u32,

    /// Length of the locally tracked rate limit window in milliseconds.
    ///
    /// Tatsu resets its per-minute quota roughly every minute; one extra
    /// second absorbs clock skew between us and the API.
    pub window_ms: u64,
}

impl RateLimitConfig {
    /// Returns the window as a [`Duration`].
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_ms: 61_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_config_default() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.window_ms, 61_000);
        assert_eq!(config.window(), Duration::from_secs(61));
    }
}
