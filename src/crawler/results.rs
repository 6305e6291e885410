//! The shared result set of a crawl

use crate::state::VisitStatus;
use std::collections::{HashMap, HashSet};

/// URL keys admitted for visiting and the status recorded for each
///
/// The coordinator keeps this behind a single lock. Admission is an
/// insert-if-absent so two visits racing on the same URL cannot both fetch
/// it.
#[derive(Debug, Default)]
pub struct ResultSet {
    admitted: HashSet<String>,
    statuses: HashMap<String, VisitStatus>,
}

impl ResultSet {
    /// Creates an empty result set
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for visiting
    ///
    /// Returns false if it was already claimed.
    pub fn admit(&mut self, url: &str) -> bool {
        if self.admitted.contains(url) {
            return false;
        }
        self.admitted.insert(url.to_string())
    }

    /// Records the status of `url`
    ///
    /// A status is assigned once. Returns false, leaving the first status in
    /// place, if one was already recorded.
    pub fn record(&mut self, url: &str, status: VisitStatus) -> bool {
        if self.statuses.contains_key(url) {
            tracing::warn!("Status for {} already recorded, keeping the first", url);
            return false;
        }
        self.statuses.insert(url.to_string(), status);
        true
    }

    /// Splits recorded URLs into (alive, dead), each sorted lexically
    pub fn partition(&self) -> (Vec<String>, Vec<String>) {
        let mut alive = Vec::new();
        let mut dead = Vec::new();

        for (url, status) in &self.statuses {
            if status.is_alive() {
                alive.push(url.clone());
            } else {
                dead.push(url.clone());
            }
        }

        alive.sort();
        dead.sort();
        (alive, dead)
    }
}
