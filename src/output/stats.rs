//! Statistics for a finished crawl

use crate::crawler::DownloadOutcome;
use crate::output::CrawlReport;

/// Outcome counts of one crawl run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Number of candidate items resolved
    pub total: usize,

    /// Items whose plain text was written
    pub downloaded: usize,

    /// Items without a plain-text link
    pub no_plain_text: usize,

    /// Items whose detail page or text could not be fetched
    pub fetch_failed: usize,

    /// Items whose text could not be written
    pub persist_failed: usize,
}

impl CrawlStatistics {
    /// Counts a sequence of outcomes
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a DownloadOutcome>) -> Self {
        let mut stats = Self::default();
        for outcome in outcomes {
            stats.total += 1;
            match outcome {
                DownloadOutcome::Downloaded { .. } => stats.downloaded += 1,
                DownloadOutcome::NoPlainTextAvailable => stats.no_plain_text += 1,
                DownloadOutcome::FetchFailed { .. } => stats.fetch_failed += 1,
                DownloadOutcome::PersistFailed { .. } => stats.persist_failed += 1,
            }
        }
        stats
    }

    /// Number of items that ended in an error
    pub fn failures(&self) -> usize {
        self.fetch_failed + self.persist_failed
    }
}

/// Prints every outcome, one per line, followed by the counts
pub fn print_report(report: &CrawlReport) {
    for outcome in &report.outcomes {
        println!("{}", outcome);
    }

    let stats = report.statistics();
    let success_rate = if stats.total > 0 {
        (stats.downloaded as f64 / stats.total as f64) * 100.0
    } else {
        0.0
    };

    println!();
    println!("=== Crawl Statistics ===");
    println!("  Items: {}", stats.total);
    println!("  Downloaded: {}", stats.downloaded);
    println!("  No plain text: {}", stats.no_plain_text);
    println!("  Fetch failed: {}", stats.fetch_failed);
    println!("  Persist failed: {}", stats.persist_failed);
    println!(
        "Success Rate: {:.1}% ({} / {} items downloaded in {:.1}s)",
        success_rate,
        stats.downloaded,
        stats.total,
        report.elapsed.as_secs_f64()
    );
}
