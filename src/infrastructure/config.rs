//! Configuration infrastructure
//!
//! Contains configuration loading, validation and saving for the harvester.
//!
//! Sources are layered, later ones winning:
//! 1. Built-in defaults
//! 2. JSON config file (optional)
//! 3. `HARVESTER__SECTION__KEY` environment variables

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tracing::info;
use url::Url;

use crate::domain::constants::{crawling, site};
use crate::infrastructure::http_client::HttpClientConfig;
use crate::infrastructure::parsing::ParsingConfig;

/// Default values not tied to the survey site itself
pub mod defaults {
    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = false;
    pub const LOG_FILE_NAME: &str = "survey-harvester.log";

    pub const CONFIG_DIR_NAME: &str = "survey-harvester";
    pub const CONFIG_FILE_NAME: &str = "harvester.json";
    pub const ENV_PREFIX: &str = "HARVESTER";
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Invalid configuration for '{field}': {message}")]
    Validation { field: String, message: String },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Complete harvester configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Endpoints of the survey site
    pub site: SiteConfig,

    /// Listing walk bounds
    pub walk: WalkConfig,

    /// HTTP client settings
    pub http: HttpClientConfig,

    /// Random pause between requests
    pub delay: DelayRange,

    /// Detail pages fetched at once
    pub detail_concurrency: usize,

    /// Selectors and patterns
    pub parsing: ParsingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Survey site endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Paginated listing endpoint
    pub listing_base_url: String,

    /// Detail endpoint; the result id is appended
    pub detail_base_url: String,

    /// Query parameter carrying the page number
    pub page_param: String,
}

/// Bounds of one listing walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    pub start_page: u32,

    /// Last page to visit; without it the walk ends on a page with no new ids
    pub end_page: Option<u32>,

    /// Maximum number of entries to collect
    pub limit: Option<usize>,

    /// Without `end_page`, give up after this many failed pages in a row (`None` keeps going)
    pub max_consecutive_page_failures: Option<u32>,
}

/// Bounded random pause, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const NONE: Self = Self { min_ms: 0, max_ms: 0 };

    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn is_zero(&self) -> bool {
        self.max_ms == 0
    }

    /// Uniformly drawn pause inside the range
    pub fn sample(&self) -> Duration {
        if self.min_ms >= self.max_ms {
            return Duration::from_millis(self.max_ms);
        }
        Duration::from_millis(fastrand::u64(self.min_ms..=self.max_ms))
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output (stderr)
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for the log file; defaults to `logs/` next to the executable
    pub directory: Option<PathBuf>,

    /// Log file name
    pub file_name: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            walk: WalkConfig::default(),
            http: HttpClientConfig::default(),
            delay: DelayRange::default(),
            detail_concurrency: crawling::DEFAULT_DETAIL_CONCURRENCY,
            parsing: ParsingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            listing_base_url: site::SURVEY_BASE_URL.to_string(),
            detail_base_url: site::RESULT_BASE_URL.to_string(),
            page_param: site::PAGE_PARAM.to_string(),
        }
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            start_page: site::FIRST_PAGE,
            end_page: None,
            limit: None,
            max_consecutive_page_failures: Some(crawling::DEFAULT_MAX_CONSECUTIVE_PAGE_FAILURES),
        }
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min_ms: crawling::DEFAULT_DELAY_MIN_MS,
            max_ms: crawling::DEFAULT_DELAY_MAX_MS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            directory: None,
            file_name: defaults::LOG_FILE_NAME.to_string(),
        }
    }
}

impl HarvestConfig {
    /// Check every value the pipeline relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("site.listing_base_url", &self.site.listing_base_url),
            ("site.detail_base_url", &self.site.detail_base_url),
        ] {
            Url::parse(value).map_err(|e| ConfigError::invalid(field, format!("'{value}' is not a valid URL: {e}")))?;
        }

        if self.site.page_param.trim().is_empty() {
            return Err(ConfigError::invalid("site.page_param", "must not be empty"));
        }

        if self.walk.limit == Some(0) {
            return Err(ConfigError::invalid("walk.limit", "must be positive"));
        }

        if let Some(end_page) = self.walk.end_page {
            if end_page < self.walk.start_page {
                return Err(ConfigError::invalid(
                    "walk.end_page",
                    format!("{end_page} is before start page {}", self.walk.start_page),
                ));
            }
        }

        if self.walk.max_consecutive_page_failures == Some(0) {
            return Err(ConfigError::invalid("walk.max_consecutive_page_failures", "must be positive"));
        }

        if self.delay.min_ms > self.delay.max_ms {
            return Err(ConfigError::invalid(
                "delay",
                format!("min {}ms exceeds max {}ms", self.delay.min_ms, self.delay.max_ms),
            ));
        }

        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::invalid("http.timeout_seconds", "must be positive"));
        }

        if self.detail_concurrency == 0 {
            return Err(ConfigError::invalid("detail_concurrency", "must be positive"));
        }

        Ok(())
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(defaults::CONFIG_DIR_NAME);
        Ok(config_dir)
    }

    /// Manager for the default config file location
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            config_path: Self::get_config_dir()?.join(defaults::CONFIG_FILE_NAME),
        })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load defaults, then the config file if present, then environment overrides
    pub fn load_config(&self) -> Result<HarvestConfig, ConfigError> {
        let settings = config::Config::builder()
            .add_source(
                config::File::from(self.config_path.as_path())
                    .format(config::FileFormat::Json)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let harvest_config: HarvestConfig = settings.try_deserialize()?;
        harvest_config.validate()?;

        info!("Loaded configuration from: {:?}", self.config_path);
        Ok(harvest_config)
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &HarvestConfig) -> anyhow::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;
        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = HarvestConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.site.page_param, "page");
        assert_eq!(config.detail_concurrency, 1);
    }

    #[test]
    fn rejects_zero_limit() {
        let mut config = HarvestConfig::default();
        config.walk.limit = Some(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { field, .. }) if field == "walk.limit"
        ));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let mut config = HarvestConfig::default();
        config.walk.start_page = 5;
        config.walk.end_page = Some(2);
        assert!(config.validate().is_err());

        let mut config = HarvestConfig::default();
        config.delay = DelayRange::new(2000, 1000);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_base_url() {
        let mut config = HarvestConfig::default();
        config.site.detail_base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn delay_samples_stay_in_range() {
        let range = DelayRange::new(10, 20);
        for _ in 0..100 {
            let pause = range.sample();
            assert!(pause >= Duration::from_millis(10) && pause <= Duration::from_millis(20));
        }
        assert_eq!(DelayRange::NONE.sample(), Duration::ZERO);
        assert!(DelayRange::NONE.is_zero());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvester.json");
        std::fs::write(&path, r#"{ "walk": { "limit": 40 }, "delay": { "min_ms": 0, "max_ms": 0 } }"#).unwrap();

        let config = ConfigManager::with_path(&path).load_config().unwrap();
        assert_eq!(config.walk.limit, Some(40));
        assert_eq!(config.walk.start_page, 1);
        assert!(config.delay.is_zero());
        assert_eq!(config.site, SiteConfig::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigManager::with_path(dir.path().join("absent.json"))
            .load_config()
            .unwrap();
        assert_eq!(config.walk, WalkConfig::default());
    }

    #[test]
    fn invalid_file_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvester.json");
        std::fs::write(&path, r#"{ "walk": { "limit": 0 } }"#).unwrap();

        assert!(matches!(
            ConfigManager::with_path(&path).load_config(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("nested").join("harvester.json"));

        let mut config = HarvestConfig::default();
        config.walk.end_page = Some(3);
        config.detail_concurrency = 4;
        manager.save_config(&config).await.unwrap();

        assert_eq!(manager.load_config().unwrap(), config);
    }
}
