//! Pending-work tracking for a running crawl
//!
//! Every scheduled visit owns one [`WorkUnit`]. The crawl is finished when
//! the last unit is dropped. A visit creates the units for the pages it
//! discovers before releasing its own, so the count cannot reach zero while
//! a parent still has children to schedule.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Counter {
    outstanding: AtomicUsize,
    idle: Notify,
}

/// Counts scheduled-but-unfinished visits and wakes waiters at zero
#[derive(Debug, Clone, Default)]
pub struct PendingWork {
    inner: Arc<Counter>,
}

impl PendingWork {
    /// Creates a tracker with no outstanding work
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one unit of work
    ///
    /// The returned guard releases the unit when dropped, including when the
    /// task holding it returns early or panics.
    pub fn enter(&self) -> WorkUnit {
        self.inner.outstanding.fetch_add(1, Ordering::SeqCst);
        WorkUnit {
            counter: Arc::clone(&self.inner),
        }
    }

    /// Number of units currently outstanding
    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::SeqCst)
    }

    /// Suspends until no work is outstanding
    ///
    /// Returns immediately if the count is already zero.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);

            // Register interest before reading the count so a release that
            // lands between the two cannot be missed.
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }

            notified.await;
        }
    }
}

/// One outstanding unit of crawl work
#[must_use = "dropping a WorkUnit immediately releases it"]
#[derive(Debug)]
pub struct WorkUnit {
    counter: Arc<Counter>,
}

impl Drop for WorkUnit {
    fn drop(&mut self) {
        if self.counter.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.counter.idle.notify_waiters();
        }
    }
}
