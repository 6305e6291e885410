//! Crawler module for fetching pages and following links
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - HTML parsing and href extraction
//! - Pending-work tracking and completion detection
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod pending;
mod results;

pub use coordinator::{Coordinator, Crawl};
pub use fetcher::{build_http_client, fetch_url, read_html};
pub use parser::{parse_page, ParsedPage};
pub use pending::{PendingWork, WorkUnit};
pub use results::ResultSet;

use crate::config::Config;
use crate::output::CrawlReport;
use crate::SweepError;

/// Runs a complete crawl operation
///
/// This is the main entry point for running a crawl. It will:
/// 1. Validate the configuration and build the HTTP client
/// 2. Start visiting from the seed URL
/// 3. Wait until every reachable in-scope page has been visited
/// 4. Return the alive/dead report
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed successfully
/// * `Err(SweepError)` - Crawl aborted on the first fatal error
///
/// # Example
///
/// ```no_run
/// use link_sweep::config::Config;
/// use link_sweep::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(&Config::for_seed("https://example.com/")).await?;
/// println!("{} dead links", report.dead.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlReport, SweepError> {
    Coordinator::new(config)?.start().wait().await
}
