use serde::Deserialize;
use std::path::PathBuf;

/// Origin that every scraped href is appended to
pub const DEFAULT_BASE_URL: &str = "http://www.gutenberg.org";

/// Path of the "top books yesterday" listing
pub const DEFAULT_LISTING_PATH: &str = "/browse/scores/top";

/// Substring that marks an anchor as a link to a book's detail page
pub const DEFAULT_ITEM_MARKER: &str = "ebook";

/// Suffix that identifies the plain-text download link
pub const DEFAULT_TEXT_SUFFIX: &str = "txt";

/// Number of concurrent detail-page workers
pub const DEFAULT_WORKERS: usize = 10;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Full URL of the listing page (origin + listing path)
    pub fn listing_url(&self) -> String {
        format!("{}{}", self.crawler.base_url, self.crawler.listing_path)
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Origin prepended to every scraped href
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the listing page, relative to the origin
    #[serde(rename = "listing-path")]
    pub listing_path: String,

    /// Substring an href must contain to count as an item link
    #[serde(rename = "item-marker")]
    pub item_marker: String,

    /// Suffix an href must end with to count as the plain-text link
    #[serde(rename = "text-suffix")]
    pub text_suffix: String,

    /// Size of the detail-page worker pool
    pub workers: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            listing_path: DEFAULT_LISTING_PATH.to_string(),
            item_marker: DEFAULT_ITEM_MARKER.to_string(),
            text_suffix: DEFAULT_TEXT_SUFFIX.to_string(),
            workers: DEFAULT_WORKERS,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "GutenbergScraper".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://www.gutenberg.org/policy/robot_access.html".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Scratch directory the plain-text files are written into
    pub directory: PathBuf,

    /// Log file written alongside stderr logging
    #[serde(rename = "log-file")]
    pub log_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("/tmp"),
            log_file: PathBuf::from("GutenbergScraper.log"),
        }
    }
}
