//! Survey Harvester - two-stage harvester for paginated survey listings
//!
//! Walks the listing pages, fetches one detail page per discovered result,
//! normalizes field names and whitespace, and merges both stages into one
//! record per result.

pub mod crawling;
pub mod domain;
pub mod infrastructure;

pub use crawling::{HarvestError, HarvestPipeline, HarvestSummary};
pub use domain::{DetailRecord, FieldMap, ListingEntry, MergedRecord};
pub use infrastructure::{FetchError, HarvestConfig, PageFetcher};

use tokio_util::sync::CancellationToken;

/// Build a pipeline over the HTTP client and run it to completion
pub async fn run(config: &HarvestConfig) -> Result<Vec<MergedRecord>, HarvestError> {
    HarvestPipeline::from_config(config)?
        .run(&CancellationToken::new())
        .await
}
