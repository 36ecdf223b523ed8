//! Infrastructure layer: HTTP fetching, HTML parsing, configuration,
//! logging and export

pub mod config;
pub mod http_client;
pub mod json_export;
pub mod logging;
pub mod parsing;
pub mod parsing_error;

// Re-export commonly used items
pub use config::{
    ConfigError, ConfigManager, DelayRange, HarvestConfig, LoggingConfig, SiteConfig, WalkConfig,
};
pub use http_client::{FetchError, HttpClient, HttpClientConfig, PageFetcher};
pub use json_export::save_records;
pub use logging::{get_log_directory, init_logging_with_config};
pub use parsing::{
    ContextualParser, DetailParser, ListingParser, ParsingConfig, ParsingError, ParsingResult,
};
