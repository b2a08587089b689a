//! Configuration management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use plantcast_core::{MAX_PLANTS_PER_REQUEST, PlantCode, default_catalog};
use plantcast_fetch::{DEFAULT_BASE_URL, FetchSettings, RateLimitPolicy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::StoreError;
use crate::persistence::{default_config_path, load_json, save_json};

// ============================================================================
// Log Level
// ============================================================================

/// Log level used when neither `--verbose` nor `RUST_LOG` is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    #[default]
    Warn,
    /// Informational.
    Info,
    /// Debug output.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// Returns the level as an `EnvFilter` directive.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

// ============================================================================
// Config
// ============================================================================

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// API endpoint settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Batching and rate-limit settings.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Plant catalog offered for selection.
    #[serde(default = "default_catalog")]
    pub plants: Vec<PlantCode>,
    /// Log level.
    #[serde(default)]
    pub log_level: LogLevel,
}

/// API endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the endpoint paths are resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Batching and rate-limit settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Plants per forecast request (1..=10).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Wait after a 429 before restarting, in seconds.
    #[serde(default = "default_cooldown_secs")]
    pub rate_limit_cooldown_secs: u64,
    /// Restarts allowed per fetch; `null` means unbounded.
    #[serde(default)]
    pub max_rate_limit_restarts: Option<u32>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_batch_size() -> usize {
    MAX_PLANTS_PER_REQUEST
}

fn default_cooldown_secs() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            rate_limit_cooldown_secs: default_cooldown_secs(),
            max_rate_limit_restarts: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            fetch: FetchConfig::default(),
            plants: default_catalog(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads and validates configuration from a specific path.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the file is not valid JSON and
    /// `StoreError::Config` if it fails validation.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub async fn load_from(path: &Path) -> Result<Self, StoreError> {
        let config: Config = match load_json(path).await {
            Ok(config) => config,
            Err(e) if e.is_not_found() => {
                debug!("Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        config.validate()?;
        info!("Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file cannot be written.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        save_json(path, self).await?;
        info!("Saved configuration");
        Ok(())
    }

    /// Writes the defaults to `path` unless a file is already there.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if `path` exists and `force` is
    /// false.
    pub async fn init_at(path: &Path, force: bool) -> Result<Self, StoreError> {
        if !force && tokio::fs::try_exists(path).await? {
            return Err(StoreError::AlreadyExists(path.display().to_string()));
        }
        let config = Self::default();
        config.save_to(path).await?;
        Ok(config)
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` describing the first problem found.
    pub fn validate(&self) -> Result<(), StoreError> {
        let url = Url::parse(&self.api.base_url)
            .map_err(|e| StoreError::Config(format!("invalid api.base_url: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(StoreError::Config(format!(
                "api.base_url must be an http(s) URL with a host, got {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(StoreError::Config(
                "api.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if !(1..=MAX_PLANTS_PER_REQUEST).contains(&self.fetch.batch_size) {
            return Err(StoreError::Config(format!(
                "fetch.batch_size must be between 1 and {MAX_PLANTS_PER_REQUEST}, got {}",
                self.fetch.batch_size
            )));
        }

        if self.plants.is_empty() {
            return Err(StoreError::Config("plants must not be empty".to_string()));
        }
        for plant in &self.plants {
            PlantCode::new(plant.as_str())
                .map_err(|e| StoreError::Config(format!("plants: {e}")))?;
        }

        Ok(())
    }

    /// Converts to the settings the fetch layer runs with.
    pub fn fetch_settings(&self) -> FetchSettings {
        let mut policy =
            RateLimitPolicy::new(Duration::from_secs(self.fetch.rate_limit_cooldown_secs));
        if let Some(max) = self.fetch.max_rate_limit_restarts {
            policy = policy.with_max_restarts(max);
        }

        FetchSettings::default()
            .with_base_url(self.api.base_url.as_str())
            .with_timeout(Duration::from_secs(self.api.timeout_secs))
            .with_batch_size(self.fetch.batch_size)
            .with_rate_limit(policy)
    }

    /// Returns the plant catalog.
    pub fn plant_codes(&self) -> &[PlantCode] {
        &self.plants
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://integra.ons.org.br/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.fetch.batch_size, 10);
        assert_eq!(config.fetch.rate_limit_cooldown_secs, 60);
        assert_eq!(config.fetch.max_rate_limit_restarts, None);
        assert_eq!(config.plants.len(), 11);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_sections_fill_in() {
        let config: Config =
            serde_json::from_str(r#"{"fetch": {"max_rate_limit_restarts": 3}, "log_level": "debug"}"#)
                .unwrap();
        assert_eq!(config.fetch.batch_size, 10);
        assert_eq!(config.fetch.max_rate_limit_restarts, Some(3));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_level.as_str(), "debug");
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(StoreError::Config(_))));

        config.api.base_url = "file:///tmp/api".to_string();
        assert!(matches!(config.validate(), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_batch_size_out_of_range() {
        let mut config = Config::default();
        config.fetch.batch_size = 0;
        assert!(config.validate().is_err());

        config.fetch.batch_size = 11;
        assert!(config.validate().is_err());

        config.fetch.batch_size = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_plants() {
        let mut config = Config::default();
        config.plants.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("plants"));
    }

    #[test]
    fn test_validate_rejects_blank_plant_code() {
        let config: Config = serde_json::from_str(r#"{"plants": ["VLAB2", " "]}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fetch_settings_conversion() {
        let mut config = Config::default();
        config.api.base_url = "http://localhost:8080/api".to_string();
        config.api.timeout_secs = 5;
        config.fetch.batch_size = 3;
        config.fetch.rate_limit_cooldown_secs = 2;
        config.fetch.max_rate_limit_restarts = Some(4);

        let settings = config.fetch_settings();
        assert_eq!(settings.base_url, "http://localhost:8080/api");
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.batch_size, 3);
        assert_eq!(settings.rate_limit.cooldown, Duration::from_secs(2));
        assert_eq!(settings.rate_limit.max_restarts, Some(4));
    }

    #[test]
    fn test_fetch_settings_unbounded_by_default() {
        let settings = Config::default().fetch_settings();
        assert_eq!(settings.rate_limit.max_restarts, None);
        assert_eq!(settings, FetchSettings::default());
    }
}
