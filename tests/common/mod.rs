//! Shared fixtures for the integration tests: an in-memory page fetcher and
//! builders for listing and detail markup.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use survey_harvester::infrastructure::config::{DelayRange, HarvestConfig};
use survey_harvester::infrastructure::http_client::{FetchError, PageFetcher};
use tokio_util::sync::CancellationToken;

pub const LISTING_BASE: &str = "https://survey.test/survey/";
pub const DETAIL_BASE: &str = "https://survey.test/result/";

pub fn listing_url(page: u32) -> String {
    format!("https://survey.test/survey/?page={page}")
}

pub fn detail_url(id: &str) -> String {
    format!("https://survey.test/result/{id}")
}

/// Config pointing at the fake origin, with pauses disabled
pub fn test_config() -> HarvestConfig {
    let mut config = HarvestConfig::default();
    config.site.listing_base_url = LISTING_BASE.to_string();
    config.site.detail_base_url = DETAIL_BASE.to_string();
    config.delay = DelayRange::NONE;
    config.http.min_request_interval_ms = 0;
    config
}

enum Reply {
    Body(String),
    Status(u16),
    Transport,
}

/// Serves canned pages by URL; anything unknown is a 404
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, Reply>,
    requests: Mutex<Vec<String>>,
    cancel_on: Option<(String, CancellationToken)>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), Reply::Body(body.into()));
        self
    }

    pub fn status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.pages.insert(url.into(), Reply::Status(status));
        self
    }

    pub fn transport_failure(mut self, url: impl Into<String>) -> Self {
        self.pages.insert(url.into(), Reply::Transport);
        self
    }

    /// Cancel `token` while serving `url`, as a Ctrl-C mid-request would
    pub fn cancel_when_serving(mut self, url: impl Into<String>, token: &CancellationToken) -> Self {
        self.cancel_on = Some((url.into(), token.clone()));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        if let Some((trigger, token)) = &self.cancel_on {
            if trigger == url {
                token.cancel();
            }
        }

        match self.pages.get(url) {
            Some(Reply::Body(body)) => Ok(body.as_bytes().to_vec()),
            Some(Reply::Status(status)) => Err(FetchError::HttpStatus {
                status: *status,
                url: url.to_string(),
            }),
            Some(Reply::Transport) => Err(FetchError::Transport {
                url: url.to_string(),
                reason: "connection reset".to_string(),
            }),
            None => Err(FetchError::HttpStatus {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}

/// Listing row: (id, added-on cell text, optional term chip)
pub type Row<'a> = (&'a str, &'a str, Option<&'a str>);

pub fn listing_page(rows: &[Row<'_>]) -> String {
    let mut body = String::new();
    for (id, added_on, term) in rows {
        body.push_str(&format!(
            r#"<tr>
                 <td><div>Some University</div></td>
                 <td><span>Computer Science</span><span>PhD</span></td>
                 <td>{added_on}</td>
                 <td><a href="/result/{id}">See More</a></td>
               </tr>"#
        ));
        if let Some(term) = term {
            body.push_str(&format!(
                r#"<tr class="tw-border-none"><td colspan="4"><div>{term}</div><div>International</div></td></tr>"#
            ));
        }
    }
    format!("<html><body><table><thead><tr><th>School</th></tr></thead><tbody>{body}</tbody></table></body></html>")
}

pub fn detail_page(definitions: &[(&str, &str)], labeled: &[(&str, &str)]) -> String {
    let definitions: String = definitions
        .iter()
        .map(|(label, value)| format!("<div><dt>{label}</dt><dd>{value}</dd></div>"))
        .collect();
    let labeled: String = labeled
        .iter()
        .map(|(label, value)| format!("<li><span>{label}:</span> <span>{value}</span></li>"))
        .collect();
    format!(
        r#"<html><body><dl>{definitions}</dl><ul class="tw-list-none">{labeled}</ul></body></html>"#
    )
}
