//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper:
//! - Building the shared HTTP client with a proper user agent string
//! - The [`PageFetcher`] capability the pipeline is written against
//! - Classifying transport failures and non-success statuses
//!
//! There is no retry logic anywhere in the fetch path. A failed request is
//! reported once and the caller decides what it means.

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching a URL
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Raw response of a GET request
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code
    pub status: u16,

    /// Response body, undecoded
    pub body: Vec<u8>,
}

impl FetchedPage {
    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body for 2xx statuses and a `FetchError::Status` otherwise
    pub fn into_success(self, url: &str) -> Result<Vec<u8>, FetchError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(FetchError::Status {
                url: url.to_string(),
                status: self.status,
            })
        }
    }
}

/// Capability to GET a URL and hand back status plus body bytes
///
/// Implementations are shared by every worker of the pool, so they must be
/// usable concurrently without external locking.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url`. Transport failures are errors; any HTTP status,
    /// including 4xx/5xx, is returned as a [`FetchedPage`].
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use gutenberg_scraper::config::UserAgentConfig;
/// use gutenberg_scraper::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL)
    let user_agent = format!(
        "{}/{} (+{})",
        config.crawler_name, config.crawler_version, config.contact_url
    );

    // Redirects stay on: the origin bounces plain http over to https
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by a shared `reqwest` client
///
/// `reqwest::Client` pools connections internally and is cheap to clone, so
/// every worker can hold the same fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wraps an already-built client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the user agent configuration and wraps it
    pub fn from_config(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| classify_error(url, e))?;

        tracing::trace!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(FetchedPage {
            status,
            body: body.to_vec(),
        })
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}
