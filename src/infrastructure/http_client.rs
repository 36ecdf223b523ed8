//! HTTP page fetching with rate limiting and error classification
//!
//! `PageFetcher` is the seam the crawling stages talk to. `HttpClient` is the
//! production implementation: one fixed identification header, a request
//! timeout and a token-bucket limiter enforcing a global minimum spacing
//! between requests, shared by every stage that holds the client.

use std::time::Duration;

use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::constants::{crawling, site};

/// Why a page could not be fetched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The origin answered with a non-success status
    #[error("HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// The origin could not be reached or the body could not be read
    #[error("Transport failure for {url}: {reason}")]
    Transport { url: String, reason: String },
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }
}

/// Anything that can turn a URL into page bytes
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Identification header sent with every request
    pub user_agent: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Global minimum spacing between two requests in milliseconds (0 disables)
    pub min_request_interval_ms: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: site::USER_AGENT.to_string(),
            timeout_seconds: crawling::DEFAULT_REQUEST_TIMEOUT_SECONDS,
            min_request_interval_ms: crawling::DEFAULT_MIN_REQUEST_INTERVAL_MS,
        }
    }
}

/// Rate-limited reqwest client
pub struct HttpClient {
    client: Client,
    rate_limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl HttpClient {
    pub fn new(config: &HttpClientConfig) -> anyhow::Result<Self> {
        use anyhow::Context;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        let rate_limiter = Quota::with_period(Duration::from_millis(config.min_request_interval_ms))
            .map(RateLimiter::direct);

        Ok(Self { client, rate_limiter })
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        debug!("Fetching URL: {}", url);

        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        debug!("Fetched {} ({} bytes, {})", url, body.len(), status);
        Ok(body.to_vec())
    }
}
