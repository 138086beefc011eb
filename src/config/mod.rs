//! Configuration module for the scraper
//!
//! Every setting has a built-in default, so the scraper runs without any
//! configuration file. A TOML file can override individual values.
//!
//! # Example
//!
//! ```no_run
//! use gutenberg_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Listing page: {}", config.listing_url());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
