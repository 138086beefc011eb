//! Gutenberg scraper: downloads plain-text editions of the top-ranked books
//!
//! The crawl is a fixed two-stage pipeline. The listing page is turned into a
//! sequence of candidate items, then each item's detail page is fetched by a
//! bounded worker pool that looks for a plain-text link and saves the text.

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for scraper operations
///
/// Only failures that end the whole run show up here. Anything that goes
/// wrong for a single item is recorded in its [`DownloadOutcome`] instead.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch listing page {url}: {source}")]
    ListingFetch {
        url: String,
        #[source]
        source: crawler::FetchError,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Worker task failed: {0}")]
    Worker(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScraperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CandidateItem, CrawlOrchestrator, DownloadOutcome};
pub use output::{CrawlReport, CrawlStatistics, ItemOutcome};
