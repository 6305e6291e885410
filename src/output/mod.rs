//! Output module for presenting crawl results
//!
//! The report is plain text on stdout: alive URLs, dead URLs, and the time
//! the crawl took.

mod report;

pub use report::{print_report, CrawlReport};
