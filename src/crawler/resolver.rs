//! Detail page resolution
//!
//! For one candidate item: fetch its detail page, pick the first plain-text
//! link, fetch that and write it to the scratch directory. Every failure is
//! turned into a [`DownloadOutcome`] so one bad item never affects another.

use crate::crawler::fetcher::{FetchError, PageFetcher};
use crate::crawler::listing::CandidateItem;
use crate::crawler::parser::{extract_anchors, Anchor};
use crate::storage::TextStore;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Result of resolving a single candidate item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The plain text was fetched and written to `path`
    Downloaded { path: PathBuf },

    /// The detail page has no plain-text link
    NoPlainTextAvailable,

    /// The detail page or the plain text could not be fetched
    FetchFailed { reason: String },

    /// The plain text was fetched but could not be written
    PersistFailed { path: PathBuf, reason: String },
}

impl DownloadOutcome {
    /// Returns true if a file was written
    pub fn is_downloaded(&self) -> bool {
        matches!(self, DownloadOutcome::Downloaded { .. })
    }

    /// Returns true for outcomes that represent an error
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            DownloadOutcome::FetchFailed { .. } | DownloadOutcome::PersistFailed { .. }
        )
    }

    fn fetch_failed(error: FetchError) -> Self {
        DownloadOutcome::FetchFailed {
            reason: error.to_string(),
        }
    }
}

impl fmt::Display for DownloadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadOutcome::Downloaded { path } => write!(f, "Downloaded ({})", path.display()),
            DownloadOutcome::NoPlainTextAvailable => write!(f, "No plain text available"),
            DownloadOutcome::FetchFailed { reason } => write!(f, "Fetch failed ({})", reason),
            DownloadOutcome::PersistFailed { reason, .. } => {
                write!(f, "Persist failed ({})", reason)
            }
        }
    }
}

/// Resolves candidate items to downloaded plain-text files
pub struct DetailResolver {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
    text_suffix: String,
    store: TextStore,
}

impl DetailResolver {
    /// Creates a resolver
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Shared page fetcher
    /// * `base_url` - Origin prepended to the plain-text href
    /// * `text_suffix` - Suffix identifying the plain-text link
    /// * `store` - Where downloaded text is written
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        base_url: impl Into<String>,
        text_suffix: impl Into<String>,
        store: TextStore,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            text_suffix: text_suffix.into(),
            store,
        }
    }

    /// Resolves one item
    ///
    /// Steps run strictly in order: fetch detail page, select link, fetch
    /// text, persist. At most two GETs and one file write; no retries.
    pub async fn resolve(&self, item: &CandidateItem) -> DownloadOutcome {
        let detail = match self.fetch_body(&item.detail_url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Detail page fetch failed for {}: {}", item.title, e);
                return DownloadOutcome::fetch_failed(e);
            }
        };

        let anchors = extract_anchors(&detail);
        let Some(href) = find_text_link(&anchors, &self.text_suffix) else {
            tracing::debug!("No plain text link for {}", item.title);
            return DownloadOutcome::NoPlainTextAvailable;
        };

        // The href is appended as-is, even when it is already absolute
        let text_url = format!("{}{}", self.base_url, href);

        tracing::info!("Downloading: {}", item.title);
        let text = match self.fetch_body(&text_url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Plain text fetch failed for {}: {}", item.title, e);
                return DownloadOutcome::fetch_failed(e);
            }
        };

        match self.store.persist(&item.title, &text).await {
            Ok(path) => {
                tracing::debug!("Wrote {} bytes to {}", text.len(), path.display());
                DownloadOutcome::Downloaded { path }
            }
            Err(e) => {
                tracing::warn!("Could not save {}: {}", item.title, e);
                DownloadOutcome::PersistFailed {
                    path: e.path().to_path_buf(),
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn fetch_body(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.fetcher.fetch(url).await?.into_success(url)
    }
}

/// Returns the href of the first anchor, in document order, ending in `suffix`
///
/// The comparison is case-sensitive on the raw href: `.TXT` or `.txt.utf-8`
/// do not match, while anything ending in the suffix does, with or without a
/// dot before it.
pub fn find_text_link(anchors: &[Anchor], suffix: &str) -> Option<String> {
    anchors
        .iter()
        .map(|anchor| anchor.href.as_str())
        .find(|href| href.ends_with(suffix))
        .map(str::to_owned)
}
