//! API client configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Base URL of version 1 of the Tatsu API.
pub const DEFAULT_BASE_URL: &str = "https://api.tatsu.gg/v1/";

/// Default timeout for HTTP requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Stand-in printed wherever the API key would be shown.
pub const REDACTED_TOKEN: &str = "********";

/// API client configuration.
///
/// `Debug` output masks the API key.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Tatsu API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Base URL all routes are resolved against.
    pub base_url: String,

    /// HTTP request timeout in seconds.
    pub timeout_seconds: u64,

    /// User-Agent override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Returns the request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Returns the User-Agent header value.
    pub fn user_agent(&self) -> String {
        self.user_agent.clone().unwrap_or_else(|| {
            format!(
                "Tatsu ({} {}) Rust reqwest",
                env!("CARGO_PKG_REPOSITORY"),
                env!("CARGO_PKG_VERSION")
            )
        })
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &self.token.as_ref().map(|_| REDACTED_TOKEN))
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert!(config.token.is_none());
        assert_eq!(config.base_url, "https://api.tatsu.gg/v1/");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_user_agent() {
        let config = ClientConfig::default();
        assert!(config.user_agent().starts_with("Tatsu ("));
        assert!(config.user_agent().contains(env!("CARGO_PKG_VERSION")));

        let config = ClientConfig {
            user_agent: Some("custom/1.0".to_string()),
            ..Default::default()
        };
        assert_eq!(config.user_agent(), "custom/1.0");
    }

    #[test]
    fn test_debug_masks_token() {
        let config = ClientConfig {
            token: Some("SUPER-SECRET-KEY".to_string()),
            ..Default::default()
        };

        let debug = format!("{:?}", config);
        assert!(!debug.contains("SUPER-SECRET-KEY"));
        assert!(debug.contains(REDACTED_TOKEN));
        assert!(debug.contains("api.tatsu.gg"));
    }
}
