//! Crawl coordinator - owns the shared state of one crawl
//!
//! This module contains:
//! - The idle [`Coordinator`], built from configuration
//! - The running [`Crawl`], which waits for completion and reports
//! - The visit task that fetches one page and fans out to its links
//!
//! Every visit runs as its own tokio task. Tasks share the result set, the
//! pending-work counter, the optional concurrency limit and a cancellation
//! token through one `Arc`. The first fatal error cancels the token; every
//! other task then winds down at its next suspension point and the error is
//! returned from [`Crawl::wait`].

use crate::config::{validate, Config};
use crate::crawler::fetcher::{build_http_client, fetch_url, read_html};
use crate::crawler::parser::parse_page;
use crate::crawler::pending::{PendingWork, WorkUnit};
use crate::crawler::results::ResultSet;
use crate::output::CrawlReport;
use crate::state::VisitStatus;
use crate::url::{site_label, LinkClassifier};
use crate::{ConfigError, SweepError};
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, Semaphore};
use tokio_util::sync::CancellationToken;
use url::Url;

type VisitFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// State shared by every visit task of one crawl
struct Shared {
    client: Client,
    classifier: LinkClassifier,
    results: Mutex<ResultSet>,
    pending: PendingWork,
    limiter: Option<Semaphore>,
    cancel: CancellationToken,
    failure: Mutex<Option<SweepError>>,
}

/// An idle crawl, configured but not yet started
pub struct Coordinator {
    shared: Arc<Shared>,
}

impl Coordinator {
    /// Creates a coordinator from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to start
    /// * `Err(SweepError)` - Invalid configuration or HTTP client failure
    pub fn new(config: &Config) -> Result<Self, SweepError> {
        validate(config)?;

        let classifier =
            LinkClassifier::from_seed(&config.crawler.seed, config.crawler.resolve_against)?;
        let client = build_http_client(&config.http)?;

        Self::with_client(client, classifier, config.crawler.max_concurrency)
    }

    /// Creates a coordinator from already-built parts
    ///
    /// `max_concurrency` caps the number of fetches in flight at once;
    /// `None` leaves fan-out unbounded. A cap of zero is rejected.
    pub fn with_client(
        client: Client,
        classifier: LinkClassifier,
        max_concurrency: Option<usize>,
    ) -> Result<Self, SweepError> {
        if max_concurrency == Some(0) {
            return Err(ConfigError::Validation(
                "max-concurrency must be at least 1".to_string(),
            )
            .into());
        }

        let shared = Shared {
            client,
            classifier,
            results: Mutex::new(ResultSet::new()),
            pending: PendingWork::new(),
            limiter: max_concurrency.map(Semaphore::new),
            cancel: CancellationToken::new(),
            failure: Mutex::new(None),
        };

        Ok(Self {
            shared: Arc::new(shared),
        })
    }

    /// The URL the crawl will start from
    pub fn seed(&self) -> &Url {
        self.shared.classifier.seed()
    }

    /// Starts crawling from the seed and returns immediately
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self) -> Crawl {
        let started = Instant::now();
        let seed = self.shared.classifier.seed().clone();

        match &self.shared.limiter {
            Some(limiter) => tracing::info!(
                "Starting crawl of {} from {} (at most {} concurrent fetches, links resolved against {})",
                site_label(&seed),
                seed,
                limiter.available_permits(),
                self.shared.classifier.link_base()
            ),
            None => tracing::info!(
                "Starting crawl of {} from {} (unbounded fetches, links resolved against {})",
                site_label(&seed),
                seed,
                self.shared.classifier.link_base()
            ),
        }

        let unit = self.shared.pending.enter();
        spawn_visit(Arc::clone(&self.shared), seed, unit);

        Crawl {
            shared: self.shared,
            started,
        }
    }
}

/// A crawl in progress
pub struct Crawl {
    shared: Arc<Shared>,
    started: Instant,
}

impl Crawl {
    /// A token that stops the crawl when cancelled
    ///
    /// Cancelling it makes [`Crawl::wait`] return [`SweepError::Cancelled`]
    /// once in-flight visits have wound down.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shared.cancel.clone()
    }

    /// Waits for every scheduled visit to finish and returns the report
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The frontier was exhausted
    /// * `Err(SweepError)` - The first fatal error hit by any visit, or
    ///   `Cancelled` if the crawl was stopped from outside
    pub async fn wait(self) -> Result<CrawlReport, SweepError> {
        self.shared.pending.wait_idle().await;

        if let Some(error) = self.shared.failure.lock().await.take() {
            return Err(error);
        }

        if self.shared.cancel.is_cancelled() {
            return Err(SweepError::Cancelled);
        }

        let report = self.report().await;
        tracing::info!(
            "Crawl completed: {} URLs checked ({} alive, {} dead) in {:?}",
            report.total(),
            report.alive.len(),
            report.dead.len(),
            report.elapsed
        );
        Ok(report)
    }

    /// Builds a report from what has been recorded so far
    ///
    /// The report is complete only once [`Crawl::wait`] would return.
    pub async fn report(&self) -> CrawlReport {
        let (alive, dead) = self.shared.results.lock().await.partition();

        CrawlReport {
            alive,
            dead,
            elapsed: self.started.elapsed(),
        }
    }
}

impl Shared {
    /// Fetches `url`, records its status and returns its in-scope links
    async fn fetch_and_expand(&self, url: &Url) -> Result<Vec<Url>, SweepError> {
        let body = {
            let _permit = match &self.limiter {
                Some(limiter) => limiter.acquire().await.ok(),
                None => None,
            };

            let response = fetch_url(&self.client, url).await?;
            let code = response.status();
            let status = VisitStatus::from_status(code);
            tracing::debug!("Fetched {} -> {} ({})", url, code, status);

            self.results.lock().await.record(url.as_str(), status);

            read_html(response, url).await?
        };

        let page = parse_page(&body);
        if let Some(title) = &page.title {
            tracing::trace!("Parsed {} ({:?}), {} anchors", url, title, page.hrefs.len());
        }

        let mut links = Vec::new();
        for href in &page.hrefs {
            match self.classifier.classify(href, url) {
                Ok(Some(link)) => links.push(link),
                Ok(None) => tracing::trace!("Skipping out-of-scope link {:?} on {}", href, url),
                Err(source) => {
                    return Err(SweepError::Resolve {
                        href: href.clone(),
                        page: url.to_string(),
                        source,
                    })
                }
            }
        }

        Ok(links)
    }

    /// Records the first fatal error and cancels the crawl
    async fn fail(&self, error: SweepError) {
        {
            let mut failure = self.failure.lock().await;
            if failure.is_none() {
                tracing::error!("Aborting crawl: {}", error);
                *failure = Some(error);
            } else {
                tracing::debug!("Ignoring error after abort: {}", error);
            }
        }

        self.cancel.cancel();
    }
}

/// Schedules a visit of `url` as an independent task
///
/// `unit` must already be registered so the crawl cannot be seen as done
/// before the task runs.
fn spawn_visit(shared: Arc<Shared>, url: Url, unit: WorkUnit) {
    tokio::spawn(visit(shared, url, unit));
}

/// Visits one URL: admit, fetch, record, expand
///
/// The work unit is held for the whole visit and released on every exit
/// path. Children get their units before this one is released.
fn visit(shared: Arc<Shared>, url: Url, unit: WorkUnit) -> VisitFuture {
    Box::pin(async move {
        let _unit = unit;

        if shared.cancel.is_cancelled() {
            return;
        }

        if !shared.results.lock().await.admit(url.as_str()) {
            tracing::trace!("Already visited {}", url);
            return;
        }

        let outcome = tokio::select! {
            _ = shared.cancel.cancelled() => {
                tracing::debug!("Visit of {} cancelled", url);
                return;
            }
            outcome = shared.fetch_and_expand(&url) => outcome,
        };

        match outcome {
            Ok(links) => {
                for link in links {
                    if shared.cancel.is_cancelled() {
                        break;
                    }
                    let child = shared.pending.enter();
                    spawn_visit(Arc::clone(&shared), link, child);
                }
            }
            Err(error) => shared.fail(error).await,
        }
    })
}
