//! Crawl coordinator - main crawl orchestration logic
//!
//! This module drives the two stages of a crawl:
//! - Collecting candidate items from the listing page
//! - Fanning the items out to a fixed pool of workers, each resolving one
//!   item at a time, and joining every outcome back together

use crate::config::Config;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::listing::{CandidateItem, ListingCollector};
use crate::crawler::resolver::DetailResolver;
use crate::output::{CrawlReport, ItemOutcome};
use crate::storage::TextStore;
use crate::ScraperError;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::Instrument;

type ItemQueue = Arc<Mutex<mpsc::Receiver<CandidateItem>>>;

/// Main crawl orchestration structure
pub struct CrawlOrchestrator {
    collector: ListingCollector,
    resolver: Arc<DetailResolver>,
    store: TextStore,
    workers: usize,
}

impl CrawlOrchestrator {
    /// Creates an orchestrator that fetches over HTTP
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOrchestrator)` - Ready to run
    /// * `Err(ScraperError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, ScraperError> {
        let fetcher = HttpFetcher::from_config(&config.user_agent)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Creates an orchestrator on top of an existing fetcher
    pub fn with_fetcher(config: &Config, fetcher: Arc<dyn PageFetcher>) -> Self {
        let crawler = &config.crawler;
        let store = TextStore::new(&config.output.directory);

        let collector = ListingCollector::new(
            Arc::clone(&fetcher),
            crawler.base_url.clone(),
            crawler.item_marker.clone(),
        );
        let resolver = DetailResolver::new(
            fetcher,
            crawler.base_url.clone(),
            crawler.text_suffix.clone(),
            store.clone(),
        );

        Self {
            collector,
            resolver: Arc::new(resolver),
            store,
            workers: crawler.workers.max(1),
        }
    }

    /// Size of the worker pool
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs a complete crawl
    ///
    /// This is the core crawling logic that:
    /// 1. Fetches the listing page (any failure here ends the run)
    /// 2. Starts the worker pool
    /// 3. Feeds every candidate item to the pool
    /// 4. Waits until every item has an outcome
    ///
    /// There is no timeout at this level: a hanging fetch holds its worker
    /// until the HTTP client gives up on it.
    pub async fn run(&self, listing_url: &str) -> Result<CrawlReport, ScraperError> {
        let span = tracing::info_span!("crawl", listing = %listing_url);
        self.run_inner(listing_url).instrument(span).await
    }

    async fn run_inner(&self, listing_url: &str) -> Result<CrawlReport, ScraperError> {
        let start_time = Instant::now();

        tracing::info!("Collecting top book info from {}", listing_url);
        let listing = self
            .collector
            .collect(listing_url)
            .await
            .map_err(|source| ScraperError::ListingFetch {
                url: listing_url.to_string(),
                source,
            })?;

        self.store.ensure_directory().await?;

        let (item_tx, item_rx) = mpsc::channel::<CandidateItem>(self.workers);
        let queue: ItemQueue = Arc::new(Mutex::new(item_rx));

        let mut pool = JoinSet::new();
        for worker_id in 0..self.workers {
            pool.spawn(
                resolve_items(worker_id, Arc::clone(&queue), Arc::clone(&self.resolver))
                    .in_current_span(),
            );
        }

        let mut dispatched = 0usize;
        for item in listing {
            // Only fails once every worker is gone; the join below reports why
            if item_tx.send(item).await.is_err() {
                break;
            }
            dispatched += 1;
        }
        drop(item_tx);
        tracing::debug!("Dispatched {} items to {} workers", dispatched, self.workers);

        let mut outcomes = Vec::with_capacity(dispatched);
        while let Some(joined) = pool.join_next().await {
            let finished = joined.map_err(|e| ScraperError::Worker(e.to_string()))?;
            outcomes.extend(finished);
        }

        let report = CrawlReport {
            outcomes,
            elapsed: start_time.elapsed(),
        };

        let stats = report.statistics();
        tracing::info!(
            "Crawl completed: {} items, {} downloaded, {} without plain text, {} failed in {:?}",
            stats.total,
            stats.downloaded,
            stats.no_plain_text,
            stats.failures(),
            report.elapsed
        );

        Ok(report)
    }
}

/// Worker loop: takes items off the shared queue until it is closed
async fn resolve_items(
    worker_id: usize,
    queue: ItemQueue,
    resolver: Arc<DetailResolver>,
) -> Vec<ItemOutcome> {
    let mut finished = Vec::new();

    loop {
        let next = queue.lock().await.recv().await;
        let Some(item) = next else {
            break;
        };

        let span = tracing::info_span!("item", worker = worker_id, title = %item.title);
        let outcome = resolver.resolve(&item).instrument(span).await;
        finished.push(ItemOutcome { item, outcome });
    }

    tracing::trace!("Worker {} resolved {} items", worker_id, finished.len());
    finished
}

/// Runs a complete crawl with the given configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Every candidate item with its outcome
/// * `Err(ScraperError)` - The listing page could not be collected
pub async fn run_crawl(config: &Config) -> Result<CrawlReport, ScraperError> {
    let orchestrator = CrawlOrchestrator::new(config)?;
    orchestrator.run(&config.listing_url()).await
}
