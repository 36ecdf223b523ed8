//! Detail fetcher
//!
//! One detail page per result id. A fetch failure never propagates: it
//! becomes a `DetailRecord` carrying the reason and no fields.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::records::DetailRecord;
use crate::infrastructure::http_client::PageFetcher;
use crate::infrastructure::parsing::{ContextualParser, DetailParseContext, DetailParser};

pub struct DetailFetcher<F: PageFetcher> {
    fetcher: Arc<F>,
    parser: DetailParser,
    detail_base_url: String,
}

impl<F: PageFetcher> DetailFetcher<F> {
    pub fn new(fetcher: Arc<F>, parser: DetailParser, detail_base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            parser,
            detail_base_url: detail_base_url.into(),
        }
    }

    /// `{detail_base}/{id}`
    pub fn detail_url(&self, id: &str) -> String {
        format!("{}/{}", self.detail_base_url.trim_end_matches('/'), id)
    }

    pub async fn fetch_detail(&self, id: &str) -> DetailRecord {
        let url = self.detail_url(id);

        match self.fetcher.fetch(&url).await {
            Ok(body) => {
                let fields = self
                    .parser
                    .parse_bytes(&body, &DetailParseContext::new(id, url.as_str()));
                debug!("Result {}: {} fields", id, fields.len());
                DetailRecord::new(id, fields)
            }
            Err(e) => {
                warn!("Detail page for result {} degraded: {}", id, e);
                DetailRecord::failed(id, e.to_string())
            }
        }
    }
}
