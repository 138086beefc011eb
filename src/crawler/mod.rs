//! Crawler module for the two-stage book crawl
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`PageFetcher`] capability
//! - Anchor extraction from HTML
//! - Listing collection and detail page resolution
//! - Worker pool orchestration

mod coordinator;
mod fetcher;
mod listing;
mod parser;
mod resolver;

pub use coordinator::{run_crawl, CrawlOrchestrator};
pub use fetcher::{build_http_client, FetchError, FetchedPage, HttpFetcher, PageFetcher};
pub use listing::{CandidateItem, Listing, ListingCollector};
pub use parser::{extract_anchors, Anchor};
pub use resolver::{find_text_link, DetailResolver, DownloadOutcome};
