//! Configuration module for tatsu.
//!
//! This module provides all configuration types and loading functionality.
//! Configuration can be loaded from YAML files and overridden by environment variables.

mod client;
mod logging;
mod rate_limit;

pub use client::{ClientConfig, DEFAULT_BASE_URL, REDACTED_TOKEN};
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use rate_limit::RateLimitConfig;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Result, TatsuError};

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "tatsu.yaml";

/// Environment variable for configuration file path.
pub const ENV_CONFIG_PATH: &str = "TATSU_CONFIG";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API client configuration.
    pub client: ClientConfig,

    /// Rate limit configuration.
    pub rate_limit: RateLimitConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads configuration with the following priority:
    /// 1. Explicit path (if provided)
    /// 2. TATSU_CONFIG environment variable
    /// 3. Default path (./tatsu.yaml)
    ///
    /// Environment overrides are applied on top. Returns defaults if no file exists.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit_path, |key| env::var(key).ok())
    }

    /// Like [`Config::load`], but reads `TATSU_*` variables through `lookup`.
    ///
    /// The result is validated once, after overrides, so a variable can
    /// replace an invalid value from the file.
    pub fn load_with<F>(explicit_path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_path = lookup(ENV_CONFIG_PATH);
        let path = Self::resolve_config_path(explicit_path, env_path.as_deref());

        let mut config = if path.exists() {
            Self::read_from_path(&path)?
        } else if explicit_path.is_some() || env_path.is_some() {
            return Err(TatsuError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        } else {
            Config::default()
        };

        config.apply_overrides_from(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::read_from_path(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML string.
    pub fn load_from_str(content: &str) -> Result<Self> {
        let config = Self::parse(content)?;
        config.validate()?;
        Ok(config)
    }

    fn read_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TatsuError::config_with_source(
                format!("Failed to read config file: {}", path.display()),
                e,
            )
        })?;

        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| TatsuError::config_with_source("Failed to parse config", e))
    }

    fn resolve_config_path(explicit_path: Option<&Path>, env_path: Option<&str>) -> PathBuf {
        if let Some(path) = explicit_path {
            return path.to_path_buf();
        }

        if let Some(env_path) = env_path {
            return PathBuf::from(env_path);
        }

        PathBuf::from(DEFAULT_CONFIG_PATH)
    }

    /// Applies environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| env::var(key).ok());
    }

    /// Applies overrides from an arbitrary variable lookup.
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Client settings
        if let Some(token) = lookup("TATSU_TOKEN") {
            self.client.token = Some(token);
        }
        if let Some(base_url) = lookup("TATSU_BASE_URL") {
            self.client.base_url = base_url;
        }
        if let Some(timeout) = lookup("TATSU_TIMEOUT_SECONDS") {
            if let Ok(timeout) = timeout.parse() {
                self.client.timeout_seconds = timeout;
            }
        }

        // Rate limit settings
        if let Some(attempts) = lookup("TATSU_MAX_ATTEMPTS") {
            if let Ok(attempts) = attempts.parse() {
                self.rate_limit.max_attempts = attempts;
            }
        }

        // Logging settings
        if let Some(level) = lookup("TATSU_LOG_LEVEL") {
            if let Ok(level) = level.parse() {
                self.logging.level = level;
            }
        }
        if let Some(format) = lookup("TATSU_LOG_FORMAT") {
            if let Ok(format) = format.parse() {
                self.logging.format = format;
            }
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.client.base_url).map_err(|e| {
            TatsuError::config_with_source(
                format!("client.base_url is not a valid URL: {}", self.client.base_url),
                e,
            )
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TatsuError::config("client.base_url must use http or https"));
        }

        if self.client.timeout_seconds == 0 {
            return Err(TatsuError::config("client.timeout_seconds must be > 0"));
        }

        if matches!(self.client.token.as_deref(), Some(t) if t.trim().is_empty()) {
            return Err(TatsuError::config("client.token must not be empty"));
        }

        if self.rate_limit.max_attempts == 0 {
            return Err(TatsuError::config("rate_limit.max_attempts must be > 0"));
        }

        if self.rate_limit.window_ms == 0 {
            return Err(TatsuError::config("rate_limit.window_ms must be > 0"));
        }

        Ok(())
    }

    /// Returns the API key, failing when none is configured.
    pub fn require_token(&self) -> Result<&str> {
        self.client.token.as_deref().ok_or_else(|| {
            TatsuError::config("No API key configured (set client.token, TATSU_TOKEN or --token)")
        })
    }
}
