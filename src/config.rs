//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::PayloadShape;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub poller: PollerConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Telemetry backend connection
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Path prefix in front of status/break/reset ("/api", or "" for legacy backends)
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    #[serde(default)]
    pub payload_shape: PayloadShape,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_backend_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_request_timeout() -> u64 {
    5000
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            api_prefix: default_api_prefix(),
            payload_shape: PayloadShape::default(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Status polling
#[derive(Debug, Clone, Deserialize)]
pub struct PollerConfig {
    #[serde(default = "default_poll_interval")]
    pub interval_ms: u64,
}

fn default_poll_interval() -> u64 {
    1000
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval(),
        }
    }
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

/// Transient on-screen notifications
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,
}

fn default_display_ms() -> u64 {
    3000
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            display_ms: default_display_ms(),
        }
    }
}

impl NotificationConfig {
    pub fn display_duration(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let search = Self::search(&Self::default_paths());
        search.report();
        search.config
    }

    /// Config file locations, most specific first
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("devcare").join("config.toml")),
            Some(PathBuf::from("./devcare.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load the first readable file among `paths`, falling back to env only
    ///
    /// Nothing is logged here; files that exist but fail to load are
    /// collected in [`ConfigSearch::errors`].
    pub fn search(paths: &[PathBuf]) -> ConfigSearch {
        let mut errors = Vec::new();

        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::load_with_env(path) {
                Ok(config) => {
                    return ConfigSearch {
                        config,
                        loaded_from: Some(path.clone()),
                        errors,
                    }
                }
                Err(e) => errors.push(e),
            }
        }

        ConfigSearch {
            config: Self::from_env(),
            loaded_from: None,
            errors,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Backend overrides
        if let Some(url) = lookup("DEVCARE_BACKEND_URL") {
            self.backend.url = url;
        }
        if let Some(prefix) = lookup("DEVCARE_API_PREFIX") {
            self.backend.api_prefix = prefix;
        }
        if let Some(shape) = lookup("DEVCARE_PAYLOAD_SHAPE") {
            match shape.parse() {
                Ok(shape) => self.backend.payload_shape = shape,
                Err(e) => tracing::warn!("Ignoring DEVCARE_PAYLOAD_SHAPE: {}", e),
            }
        }

        // Poller overrides
        if let Some(interval) = lookup("DEVCARE_POLL_INTERVAL_MS") {
            match interval.parse() {
                Ok(ms) => self.poller.interval_ms = ms,
                Err(_) => tracing::warn!(
                    "Ignoring DEVCARE_POLL_INTERVAL_MS: '{}' is not a number",
                    interval
                ),
            }
        }

        // Logging overrides
        if let Some(level) = lookup("DEVCARE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("DEVCARE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Outcome of [`Config::search`]
#[derive(Debug)]
pub struct ConfigSearch {
    pub config: Config,
    pub loaded_from: Option<PathBuf>,
    pub errors: Vec<ConfigError>,
}

impl ConfigSearch {
    /// Log where the config came from and every file that was skipped
    pub fn report(&self) {
        for e in &self.errors {
            tracing::warn!("{}; skipping", e);
        }
        match &self.loaded_from {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::debug!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# DevCare Dashboard Configuration
#
# Environment variables override these settings:
# - DEVCARE_BACKEND_URL
# - DEVCARE_API_PREFIX
# - DEVCARE_PAYLOAD_SHAPE
# - DEVCARE_POLL_INTERVAL_MS
# - DEVCARE_LOG_LEVEL
# - DEVCARE_LOG_FORMAT

[backend]
# Telemetry backend base URL
url = "http://127.0.0.1:5000"

# Path prefix for status/break/reset/health ("" for legacy backends)
api_prefix = "/api"

# Status payload shape: auto, nested or flat
payload_shape = "auto"

# Per-request timeout (ms)
request_timeout_ms = 5000

[poller]
# Time between status polls (ms)
interval_ms = 1000

[notifications]
# How long a notification stays on screen (ms)
display_ms = 3000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json
format = "pretty"
"#
    .to_string()
}
