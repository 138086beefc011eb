//! Output module for crawl results
//!
//! This module handles:
//! - Pairing each candidate item with its outcome
//! - Counting outcomes per kind
//! - Printing the final report to stdout

pub mod stats;

pub use stats::{print_report, CrawlStatistics};

use crate::crawler::{CandidateItem, DownloadOutcome};
use std::fmt;
use std::time::Duration;

/// The outcome of one candidate item, with the item it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub item: CandidateItem,
    pub outcome: DownloadOutcome,
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.outcome, self.item.title)
    }
}

/// Everything a finished crawl produced
///
/// Outcomes are in completion order, not listing order.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub outcomes: Vec<ItemOutcome>,
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Counts outcomes per kind
    pub fn statistics(&self) -> CrawlStatistics {
        CrawlStatistics::from_outcomes(self.outcomes.iter().map(|o| &o.outcome))
    }

    /// Looks up the outcome for a title
    ///
    /// Returns the first match when several items share a title.
    pub fn outcome_for(&self, title: &str) -> Option<&DownloadOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.item.title == title)
            .map(|o| &o.outcome)
    }
}
