//! Harvest pipeline
//!
//! Construction only wires the stages together; nothing is fetched until
//! `run` is awaited. Detail pages are fetched through a bounded, order
//! preserving pool so merged records always follow listing discovery order.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::{StreamExt, TryStreamExt, stream};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::HarvestError;
use super::detail_fetcher::DetailFetcher;
use super::listing_walker::{ListingWalker, WalkOptions};
use super::politeness::polite_pause;
use crate::domain::records::{DetailRecord, ListingEntry, MergedRecord};
use crate::domain::services::{Normalize, merge};
use crate::infrastructure::config::{DelayRange, HarvestConfig};
use crate::infrastructure::http_client::{HttpClient, PageFetcher};
use crate::infrastructure::parsing::{DetailParser, ListingParser};

/// Outcome counters of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Unique listing entries discovered
    pub entries: usize,
    /// Records whose detail page could not be fetched
    pub degraded: usize,
    pub elapsed: Duration,
}

pub struct HarvestPipeline<F: PageFetcher> {
    walker: ListingWalker<F>,
    details: DetailFetcher<F>,
    delay: DelayRange,
    detail_concurrency: usize,
}

impl HarvestPipeline<HttpClient> {
    /// Pipeline over the rate-limited HTTP client
    pub fn from_config(config: &HarvestConfig) -> Result<Self, HarvestError> {
        config.validate()?;
        let client = HttpClient::new(&config.http).map_err(|e| HarvestError::Client(format!("{e:#}")))?;
        Self::new(config, client)
    }
}

impl<F: PageFetcher> HarvestPipeline<F> {
    pub fn new(config: &HarvestConfig, fetcher: F) -> Result<Self, HarvestError> {
        config.validate()?;

        let fetcher = Arc::new(fetcher);
        let walker = ListingWalker::new(
            Arc::clone(&fetcher),
            ListingParser::with_config(&config.parsing.listing)?,
            WalkOptions::from_config(config),
        );
        let details = DetailFetcher::new(
            fetcher,
            DetailParser::with_config(&config.parsing.detail)?,
            config.site.detail_base_url.as_str(),
        );

        Ok(Self {
            walker,
            details,
            delay: config.delay,
            detail_concurrency: config.detail_concurrency.max(1),
        })
    }

    /// Run both stages and return the merged, normalized records
    pub async fn run(&self, cancel: &CancellationToken) -> Result<Vec<MergedRecord>, HarvestError> {
        self.run_with_summary(cancel).await.map(|(records, _)| records)
    }

    pub async fn run_with_summary(
        &self,
        cancel: &CancellationToken,
    ) -> Result<(Vec<MergedRecord>, HarvestSummary), HarvestError> {
        let started = Instant::now();
        info!("🚀 Starting harvest");

        let entries = self.walker.walk(cancel).await?;
        info!("Listing stage done: {} unique results", entries.len());

        let details = self.collect_details(&entries, cancel).await?;

        let records: Vec<MergedRecord> = merge(&entries, details)
            .iter()
            .map(MergedRecord::normalized)
            .collect();

        let summary = HarvestSummary {
            entries: entries.len(),
            degraded: records.iter().filter(|r| r.is_degraded()).count(),
            elapsed: started.elapsed(),
        };
        info!(
            "✅ Harvest finished: {} records, {} degraded, {:.1}s",
            records.len(),
            summary.degraded,
            summary.elapsed.as_secs_f64()
        );

        Ok((records, summary))
    }

    /// One normalized detail record per entry, in entry order
    async fn collect_details(
        &self,
        entries: &[ListingEntry],
        cancel: &CancellationToken,
    ) -> Result<Vec<DetailRecord>, HarvestError> {
        info!(
            "Fetching {} detail pages ({} at a time)",
            entries.len(),
            self.detail_concurrency
        );

        let details: Vec<DetailRecord> = stream::iter(entries.iter().enumerate())
            .map(|(index, entry)| async move {
                if index > 0 {
                    polite_pause(self.delay, cancel).await?;
                }
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => Err(HarvestError::Cancelled),
                    record = self.details.fetch_detail(&entry.id) => Ok(record.normalized()),
                }
            })
            .buffered(self.detail_concurrency)
            .try_collect()
            .await?;

        let failed = details.iter().filter(|d| d.is_failed()).count();
        if failed > 0 {
            warn!("{} of {} detail pages could not be fetched", failed, details.len());
        }
        Ok(details)
    }
}
