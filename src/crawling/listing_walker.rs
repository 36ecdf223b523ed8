//! Listing walker
//!
//! Visits listing pages in order starting at `start_page` and emits every
//! result id the first time it is seen. The walk ends when:
//! 1. the page number passes `end_page`
//! 2. `limit` entries were emitted, even mid-page
//! 3. a fetched page brings no new id and no `end_page` is set
//!
//! A page that cannot be fetched is skipped without a pause and never counts
//! as "no new id". Without an `end_page`, too many failed pages in a row end
//! the walk early; a bounded walk always runs to `end_page`.

use std::collections::HashSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::HarvestError;
use super::politeness::polite_pause;
use crate::domain::records::ListingEntry;
use crate::infrastructure::config::{DelayRange, HarvestConfig};
use crate::infrastructure::http_client::PageFetcher;
use crate::infrastructure::parsing::{ContextualParser, ListingParser, ParseContext};

/// Bounds and pacing of one walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    pub base_url: String,
    pub page_param: String,
    pub start_page: u32,
    pub end_page: Option<u32>,
    pub limit: Option<usize>,
    pub delay: DelayRange,
    pub max_consecutive_page_failures: Option<u32>,
}

impl WalkOptions {
    pub fn from_config(config: &HarvestConfig) -> Self {
        Self {
            base_url: config.site.listing_base_url.clone(),
            page_param: config.site.page_param.clone(),
            start_page: config.walk.start_page,
            end_page: config.walk.end_page,
            limit: config.walk.limit,
            delay: config.delay,
            max_consecutive_page_failures: config.walk.max_consecutive_page_failures,
        }
    }

    /// `{base}/?{param}={page}`
    pub fn page_url(&self, page: u32) -> String {
        format!("{}/?{}={}", self.base_url.trim_end_matches('/'), self.page_param, page)
    }

    /// Failure guard; only an unbounded walk can spin forever on a dead origin
    fn gives_up_after(&self, consecutive_failures: u32) -> bool {
        self.end_page.is_none()
            && self
                .max_consecutive_page_failures
                .is_some_and(|max| consecutive_failures >= max)
    }

    fn limit_reached(&self, collected: usize) -> bool {
        self.limit.is_some_and(|limit| collected >= limit)
    }
}

pub struct ListingWalker<F: PageFetcher> {
    fetcher: Arc<F>,
    parser: ListingParser,
    options: WalkOptions,
}

impl<F: PageFetcher> ListingWalker<F> {
    pub fn new(fetcher: Arc<F>, parser: ListingParser, options: WalkOptions) -> Self {
        Self {
            fetcher,
            parser,
            options,
        }
    }

    /// Walk the listing and return unique entries in discovery order
    pub async fn walk(&self, cancel: &CancellationToken) -> Result<Vec<ListingEntry>, HarvestError> {
        let options = &self.options;
        let mut seen: HashSet<String> = HashSet::new();
        let mut entries: Vec<ListingEntry> = Vec::new();
        let mut consecutive_failures: u32 = 0;
        let mut page = options.start_page;

        info!(
            "Walking listing {} from page {} (end: {:?}, limit: {:?})",
            options.base_url, options.start_page, options.end_page, options.limit
        );

        if options.limit_reached(0) {
            return Ok(entries);
        }

        loop {
            if options.end_page.is_some_and(|end_page| page > end_page) {
                info!("Reached end page {:?}", options.end_page);
                break;
            }

            let url = options.page_url(page);
            let fetched = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(HarvestError::Cancelled),
                fetched = self.fetcher.fetch(&url) => fetched,
            };

            let body = match fetched {
                Ok(body) => {
                    consecutive_failures = 0;
                    body
                }
                Err(e) => {
                    consecutive_failures += 1;
                    warn!("Skipping listing page {}: {}", page, e);
                    if options.gives_up_after(consecutive_failures) {
                        warn!("Giving up after {} failed pages in a row", consecutive_failures);
                        break;
                    }
                    match page.checked_add(1) {
                        Some(next) => page = next,
                        None => break,
                    }
                    continue;
                }
            };

            let rows = self.parser.parse_bytes(&body, &ParseContext::new(page, url.as_str()));
            let total_rows = rows.len();
            let mut new_ids = 0usize;

            for row in rows {
                if !seen.insert(row.id.clone()) {
                    debug!("Duplicate result {} on page {}", row.id, page);
                    continue;
                }
                let entry = ListingEntry::from(row);
                debug!("New result {} on page {}", entry, page);
                entries.push(entry);
                new_ids += 1;

                if options.limit_reached(entries.len()) {
                    info!("Limit of {} entries reached on page {}", entries.len(), page);
                    return Ok(entries);
                }
            }

            info!("Page {}: {} new of {} rows ({} total)", page, new_ids, total_rows, entries.len());

            if new_ids == 0 && options.end_page.is_none() {
                info!("No new results on page {}, end of listing", page);
                break;
            }

            let Some(next) = page.checked_add(1) else {
                break;
            };
            page = next;
            polite_pause(options.delay, cancel).await?;
        }

        Ok(entries)
    }
}
