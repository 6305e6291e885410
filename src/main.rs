//! link-sweep main entry point
//!
//! This is the command-line interface for the link-sweep dead link finder.

use anyhow::Context;
use clap::Parser;
use link_sweep::config::{load_config, validate, Config};
use link_sweep::crawler::Coordinator;
use link_sweep::output::print_report;
use link_sweep::url::LinkBase;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// link-sweep: find dead links on a single site
///
/// Starting from one seed page, link-sweep follows every same-host link,
/// fetches each page once, and lists which URLs answered 200 (alive) and
/// which did not (dead).
#[derive(Parser, Debug)]
#[command(name = "link-sweep")]
#[command(version)]
#[command(about = "Find dead links on a single site", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from (overrides the config file)
    #[arg(value_name = "SEED")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of concurrent fetches (unbounded by default)
    #[arg(long, value_name = "N")]
    max_concurrency: Option<usize>,

    /// Resolve relative links against the site root or the containing page
    #[arg(long, value_name = "root|page")]
    resolve_against: Option<LinkBase>,

    /// Per-request timeout in milliseconds (no timeout by default)
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// User-Agent header to send
    #[arg(long, value_name = "AGENT")]
    user_agent: Option<String>,

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

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    tracing::debug!("Effective configuration: {:?}", config);

    let crawl = Coordinator::new(&config)
        .context("Failed to set up crawl")?
        .start();
    println!("Loading");

    let token = crawl.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping crawl");
            token.cancel();
        }
    });

    match crawl.wait().await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e).context("Crawl aborted")
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so the report on stdout stays clean.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_sweep=info,warn"),
            1 => EnvFilter::new("link_sweep=debug,info"),
            2 => EnvFilter::new("link_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Merges defaults, the optional config file and command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(seed) = &cli.seed {
        config.crawler.seed = seed.clone();
    }
    if let Some(limit) = cli.max_concurrency {
        config.crawler.max_concurrency = Some(limit);
    }
    if let Some(link_base) = cli.resolve_against {
        config.crawler.resolve_against = link_base;
    }
    if let Some(ms) = cli.timeout_ms {
        config.http.request_timeout_ms = Some(ms);
    }
    if let Some(agent) = &cli.user_agent {
        config.http.user_agent = Some(agent.clone());
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}
