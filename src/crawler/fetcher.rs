//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - Enforcing the minimum delay between consecutive requests
//! - Decoding bodies and extracting links
//! - Error classification
//!
//! A failed fetch is an ordinary per-page outcome: it is returned as
//! [`FetchOutcome::Failed`] and never ends the crawl.

use crate::config::Config;
use crate::crawler::decode::decode_body;
use crate::crawler::parser::parse_html;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use url::Url;

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// Decoded page body
    pub html: String,
    /// Page title, if present
    pub title: Option<String>,
    /// Absolute links found on the page, in document order
    pub links: Vec<String>,
}

/// Why a page could not be fetched
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("not an HTML page ({content_type})")]
    NotHtml { content_type: String },

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to read body: {0}")]
    Body(String),
}

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The page was fetched and parsed
    Fetched(FetchedPage),
    /// The page could not be fetched
    Failed(FetchError),
}

/// Retrieves pages for the crawler
///
/// Implementations must not panic or return early errors for unreachable
/// pages; every failure is folded into [`FetchOutcome::Failed`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration (user agent and request timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.crawler.request_timeout);

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP(S), one at a time
pub struct HttpFetcher {
    client: Client,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl HttpFetcher {
    /// Creates a fetcher around an existing client
    pub fn new(client: Client, min_interval: Duration) -> Self {
        Self {
            client,
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Creates a fetcher from the crawler configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::new(
            client,
            Duration::from_millis(config.crawler.minimum_time_between_requests),
        ))
    }

    /// Sleeps until at least `min_interval` has passed since the last request
    async fn wait_for_slot(&self) {
        let mut last_request = self.last_request.lock().await;
        if let Some(last) = *last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last_request = Some(Instant::now());
    }

    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.wait_for_slot().await;

        let response = self.client.get(url).send().await.map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(content_type) = content_type.as_deref() {
            if !is_html(content_type) {
                return Err(FetchError::NotHtml {
                    content_type: content_type.to_string(),
                });
            }
        }

        let final_url = response.url().clone();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(build_page(final_url, content_type.as_deref(), &bytes))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        match self.fetch_page(url).await {
            Ok(page) => FetchOutcome::Fetched(page),
            Err(e) => FetchOutcome::Failed(e),
        }
    }
}

/// Decodes a body and parses out its title and links
fn build_page(final_url: Url, content_type: Option<&str>, bytes: &[u8]) -> FetchedPage {
    let html = decode_body(bytes, content_type);
    let parsed = parse_html(&html, &final_url);

    FetchedPage {
        final_url: final_url.to_string(),
        html,
        title: parsed.title,
        links: parsed.links,
    }
}

/// Returns true for HTML and XHTML media types
fn is_html(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    media_type == "text/html" || media_type == "application/xhtml+xml"
}

fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Connect(e.to_string())
    } else {
        FetchError::Network(e.to_string())
    }
}
