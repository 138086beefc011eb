//! Gutenberg scraper entry point
//!
//! Runs the full crawl with no arguments and prints one line per book.

use anyhow::Context;
use clap::Parser;
use gutenberg_scraper::config::{load_config, Config};
use gutenberg_scraper::crawler::run_crawl;
use gutenberg_scraper::output::print_report;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Downloads plain-text editions of yesterday's top 100 Project Gutenberg books
///
/// Every book on the listing page is checked for a plain-text download, and
/// the ones that have it are saved to the output directory. Individual books
/// that fail do not fail the run; only an unreachable listing page does.
#[derive(Parser, Debug)]
#[command(name = "gutenberg-scraper")]
#[command(version)]
#[command(about = "Downloads plain-text editions of the top Gutenberg books", long_about = None)]
struct Cli {
    /// Optional TOML configuration file overriding the built-in defaults
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    setup_logging(cli.verbose, cli.quiet, &config.output.log_file)?;

    if let Some(path) = &cli.config {
        tracing::info!("Configuration loaded from {}", path.display());
    }
    tracing::info!(
        "Scraping {} with {} workers into {}",
        config.listing_url(),
        config.crawler.workers,
        config.output.directory.display()
    );

    let report = match run_crawl(&config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    print_report(&report);

    Ok(())
}

/// Sets up logging to stderr and to the log file, filtered by verbosity
///
/// `RUST_LOG` takes precedence over the verbosity flags when set.
fn setup_logging(verbose: u8, quiet: bool, log_file: &Path) -> anyhow::Result<()> {
    let default_filter = if quiet {
        // Only show errors
        "error"
    } else {
        match verbose {
            0 => "gutenberg_scraper=info,warn",
            1 => "gutenberg_scraper=debug,info",
            2 => "gutenberg_scraper=trace,debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_file(false),
        )
        .init();

    Ok(())
}
