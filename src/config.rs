//! Configuration management for IterView
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, ViewerError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable that overrides the record source base URL
pub const API_BASE_ENV: &str = "ITERVIEW_API_BASE";

/// Main configuration structure for IterView
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote record source settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Pager behavior settings
    #[serde(default)]
    pub viewer: ViewerConfig,
}

/// Remote record source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the service exposing `/iterations/meta` and `/iteration/{idx}`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional per-request timeout in seconds
    ///
    /// When unset, the transport's own behavior applies and a request may
    /// wait indefinitely for the service.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_user_agent() -> String {
    format!("iterview/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    /// Request timeout as a `Duration`, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

/// Pager behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Page shown when `browse` starts without `--page`
    #[serde(default = "default_start_page")]
    pub start_page: u32,

    /// Emit ANSI colors in rendered output
    #[serde(default = "default_colors")]
    pub colors: bool,
}

fn default_start_page() -> u32 {
    1
}

fn default_colors() -> bool {
    true
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            start_page: default_start_page(),
            colors: default_colors(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ViewerError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ViewerError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var(API_BASE_ENV) {
            tracing::debug!(base_url = %base_url, "Env override: {}", API_BASE_ENV);
            self.api.base_url = base_url;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.api_base {
            tracing::debug!(base_url = %base_url, "CLI override: --api-base");
            self.api.base_url = base_url.clone();
        }

        if cli.no_color {
            self.viewer.colors = false;
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is not an absolute http(s) URL, the
    /// timeout is zero, or the start page is zero
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api.base_url).map_err(|e| {
            ViewerError::Config(format!(
                "Invalid api.base_url '{}': {}",
                self.api.base_url, e
            ))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ViewerError::Config(format!(
                "api.base_url must use http or https, got '{}'",
                url.scheme()
            ))
            .into());
        }

        if self.api.timeout_seconds == Some(0) {
            return Err(ViewerError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.viewer.start_page == 0 {
            return Err(ViewerError::Config(
                "viewer.start_page is 1-based and must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
