//! Crawling layer
//!
//! Drives the two harvesting stages over a `PageFetcher`:
//! - `listing_walker`: paginated listing walk with global id dedup
//! - `detail_fetcher`: per-result detail page, failures degraded into the record
//! - `pipeline`: walk → details → normalize → merge
//! - `politeness`: cancellable random pauses between requests

pub mod detail_fetcher;
pub mod listing_walker;
pub mod pipeline;
pub mod politeness;

pub use detail_fetcher::DetailFetcher;
pub use listing_walker::{ListingWalker, WalkOptions};
pub use pipeline::{HarvestPipeline, HarvestSummary};
pub use politeness::polite_pause;

use thiserror::Error;

use crate::infrastructure::config::ConfigError;
use crate::infrastructure::parsing_error::ParsingError;

/// Conditions that end a harvest without records
///
/// Page and detail fetch failures never show up here; they are absorbed by
/// the walker and the detail fetcher.
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Parser setup failed: {0}")]
    Parser(#[from] ParsingError),

    #[error("HTTP client setup failed: {0}")]
    Client(String),

    #[error("Harvest cancelled")]
    Cancelled,
}
