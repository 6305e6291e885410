//! Configuration module for link-sweep
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every key is optional; an empty file crawls the default seed with
//! unbounded concurrency.
//!
//! # Example
//!
//! ```no_run
//! use link_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("link-sweep.toml")).unwrap();
//! println!("Crawling from: {}", config.crawler.seed);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig, DEFAULT_SEED};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, MAX_CONCURRENCY_LIMIT};
