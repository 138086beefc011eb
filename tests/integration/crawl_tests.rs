//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use async_trait::async_trait;
use gutenberg_scraper::config::Config;
use gutenberg_scraper::crawler::{
    CrawlOrchestrator, DownloadOutcome, FetchError, FetchedPage, PageFetcher,
};
use gutenberg_scraper::ScraperError;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a configuration pointing at the mock server and a scratch directory
fn create_test_config(base_url: &str, output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.base_url = base_url.to_string();
    config.output.directory = output_dir.to_path_buf();
    config
}

async fn mount_page(server: &MockServer, page_path: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_full_crawl_mixed_outcomes() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/browse/scores/top",
        200,
        r#"<html><body>
            <h2>Top 100 EBooks yesterday</h2>
            <ol>
                <li><a href="/ebooks/1">Alpha</a></li>
                <li><a href="/ebooks/2">Beta</a></li>
                <li><a href="/ebooks/3">Gamma</a></li>
            </ol>
            <a href="/about/">About</a>
        </body></html>"#,
    )
    .await;

    mount_page(
        &mock_server,
        "/ebooks/1",
        200,
        r#"<table>
            <tr><td><a href="/ebooks/1.html.images">Read online</a></td></tr>
            <tr><td><a href="/ebooks/1.txt.utf-8">Plain Text UTF-8</a></td></tr>
            <tr><td><a href="/cache/epub/1/pg1.txt">Plain Text</a></td></tr>
            <tr><td><a href="/files/1/1-0.txt">Mirror</a></td></tr>
        </table>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/cache/epub/1/pg1.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"HELLO".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/ebooks/2",
        200,
        r#"<a href="/ebooks/2.epub.images">EPUB</a><a href="/ebooks/2.kindle">Kindle</a>"#,
    )
    .await;

    // /ebooks/3 is not mounted, so the mock server answers 404

    let config = create_test_config(&mock_server.uri(), output.path());
    let orchestrator = CrawlOrchestrator::new(&config).unwrap();
    let report = orchestrator.run(&config.listing_url()).await.unwrap();

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(
        report.outcome_for("Alpha"),
        Some(&DownloadOutcome::Downloaded {
            path: output.path().join("Alpha.txt")
        })
    );
    assert_eq!(
        report.outcome_for("Beta"),
        Some(&DownloadOutcome::NoPlainTextAvailable)
    );
    assert!(matches!(
        report.outcome_for("Gamma"),
        Some(DownloadOutcome::FetchFailed { .. })
    ));

    assert_eq!(files_in(output.path()), vec!["Alpha.txt".to_string()]);
    assert_eq!(
        std::fs::read(output.path().join("Alpha.txt")).unwrap(),
        b"HELLO"
    );

    let stats = report.statistics();
    assert_eq!(stats.downloaded, 1);
    assert_eq!(stats.no_plain_text, 1);
    assert_eq!(stats.fetch_failed, 1);

    // listing + three detail pages + one text file
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 5);
}

#[tokio::test]
async fn test_listing_failure_fails_run() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&mock_server, "/browse/scores/top", 500, "Internal Server Error").await;

    let config = create_test_config(&mock_server.uri(), output.path());
    let orchestrator = CrawlOrchestrator::new(&config).unwrap();
    let result = orchestrator.run(&config.listing_url()).await;

    match result {
        Err(ScraperError::ListingFetch { url, source }) => {
            assert_eq!(url, config.listing_url());
            assert!(matches!(source, FetchError::Status { status: 500, .. }));
        }
        other => panic!("expected listing failure, got {:?}", other.map(|r| r.outcomes)),
    }

    // Nothing past the listing page was requested
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_listing_unreachable_fails_run() {
    let output = TempDir::new().unwrap();
    let config = create_test_config("http://127.0.0.1:9", output.path());

    let orchestrator = CrawlOrchestrator::new(&config).unwrap();
    let result = orchestrator.run(&config.listing_url()).await;

    assert!(matches!(result, Err(ScraperError::ListingFetch { .. })));
}

#[tokio::test]
async fn test_absolute_text_href_is_not_resolved() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/browse/scores/top",
        200,
        r#"<a href="/ebooks/7">Seven</a>"#,
    )
    .await;

    let absolute = format!("{}/files/7.txt", mock_server.uri());
    mount_page(
        &mock_server,
        "/ebooks/7",
        200,
        &format!(r#"<a href="{}">Plain Text</a>"#, absolute),
    )
    .await;
    mount_page(&mock_server, "/files/7.txt", 200, "never fetched").await;

    let config = create_test_config(&mock_server.uri(), output.path());
    let orchestrator = CrawlOrchestrator::new(&config).unwrap();
    let report = orchestrator.run(&config.listing_url()).await.unwrap();

    // origin + absolute URL is not a usable URL, so the item fails
    assert!(matches!(
        report.outcome_for("Seven"),
        Some(DownloadOutcome::FetchFailed { .. })
    ));
    assert!(files_in(output.path()).is_empty());
}

#[tokio::test]
async fn test_marker_matches_any_href_containing_it() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/browse/scores/top",
        200,
        r#"<a href="/ebooks/search/?query=x">Search</a>
           <a href="/ebooks/11">Eleven</a>
           <a href="/browse/authors/a">Authors</a>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/ebooks/11",
        200,
        r#"<a href="/ebooks/11.txt">Plain Text</a>"#,
    )
    .await;
    mount_page(&mock_server, "/ebooks/11.txt", 200, "eleven").await;

    let config = create_test_config(&mock_server.uri(), output.path());
    let orchestrator = CrawlOrchestrator::new(&config).unwrap();
    let report = orchestrator.run(&config.listing_url()).await.unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert!(report.outcome_for("Eleven").unwrap().is_downloaded());
    // the search page exists only as a 404 here, but it was still dispatched
    assert!(report.outcome_for("Search").unwrap().is_failure());
    assert!(report.outcome_for("Authors").is_none());
}

/// Fetcher that tracks how many requests are in flight at once
struct InFlightCounter {
    books: usize,
    current: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl PageFetcher for InFlightCounter {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(20)).await;

        let body = if url.ends_with("/top") {
            (0..self.books)
                .map(|i| format!(r#"<a href="/ebooks/{i}">Book {i}</a>"#))
                .collect::<String>()
        } else if url.ends_with(".txt") {
            "text".to_string()
        } else {
            let id = url.rsplit('/').next().unwrap_or_default();
            format!(r#"<a href="/files/{id}.txt">Plain Text</a>"#)
        };

        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(FetchedPage {
            status: 200,
            body: body.into_bytes(),
        })
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_at_most_ten_items_in_flight() {
    let output = TempDir::new().unwrap();
    let mut config = create_test_config("http://books.test", output.path());
    config.crawler.listing_path = "/top".to_string();

    let fetcher = Arc::new(InFlightCounter {
        books: 40,
        current: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let orchestrator = CrawlOrchestrator::with_fetcher(&config, fetcher.clone());

    let report = orchestrator.run(&config.listing_url()).await.unwrap();

    assert_eq!(orchestrator.workers(), 10);
    assert_eq!(report.statistics().downloaded, 40);
    let peak = fetcher.peak.load(Ordering::SeqCst);
    assert!(peak <= 10, "peak in-flight fetches was {}", peak);
    assert!(peak > 1, "workers never overlapped");
    assert_eq!(files_in(output.path()).len(), 40);
}
