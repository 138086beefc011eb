//! Listing page collection
//!
//! Turns the ranked listing page into candidate items. The page is fetched
//! once; the candidates are then produced lazily from its anchors.

use crate::crawler::fetcher::{FetchError, PageFetcher};
use crate::crawler::parser::{extract_anchors, Anchor};
use std::fmt;
use std::sync::Arc;

/// A book found on the listing page, waiting to be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateItem {
    /// Raw anchor text from the listing page
    pub title: String,

    /// Origin concatenated with the anchor's href
    pub detail_url: String,
}

impl fmt::Display for CandidateItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.title, self.detail_url)
    }
}

/// Collects candidate items from the listing page
pub struct ListingCollector {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
    item_marker: String,
}

impl ListingCollector {
    /// Creates a collector
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Shared page fetcher
    /// * `base_url` - Origin prepended to every matching href
    /// * `item_marker` - Substring an href must contain to be an item link
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        base_url: impl Into<String>,
        item_marker: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            item_marker: item_marker.into(),
        }
    }

    /// Fetches the listing page and returns its candidate items
    ///
    /// A transport failure or a non-2xx status fails the whole collection;
    /// there is no partial listing. Calling this again fetches the page again.
    pub async fn collect(&self, listing_url: &str) -> Result<Listing, FetchError> {
        let body = self
            .fetcher
            .fetch(listing_url)
            .await?
            .into_success(listing_url)?;

        let anchors = extract_anchors(&body);
        tracing::debug!("Listing page has {} anchors", anchors.len());

        Ok(Listing {
            anchors: anchors.into_iter(),
            base_url: self.base_url.clone(),
            item_marker: self.item_marker.clone(),
        })
    }
}

/// Single-pass sequence of candidate items from one listing fetch
///
/// Only anchors whose href contains the item marker are yielded. The match
/// is a plain substring test, so it also picks up navigation links such as
/// `/ebooks/search/`.
#[derive(Debug)]
pub struct Listing {
    anchors: std::vec::IntoIter<Anchor>,
    base_url: String,
    item_marker: String,
}

impl Iterator for Listing {
    type Item = CandidateItem;

    fn next(&mut self) -> Option<CandidateItem> {
        let marker = self.item_marker.as_str();
        let anchor = self.anchors.find(|a| a.href.contains(marker))?;

        Some(CandidateItem {
            detail_url: format!("{}{}", self.base_url, anchor.href),
            title: anchor.text,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.anchors.size_hint().1)
    }
}
