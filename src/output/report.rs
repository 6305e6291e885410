//! Console report of a finished crawl

use crate::state::VisitStatus;
use std::fmt::Write as _;
use std::time::Duration;

/// Final results of one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// URLs that answered 200, sorted
    pub alive: Vec<String>,

    /// URLs that answered with any other status, sorted
    pub dead: Vec<String>,

    /// Wall-clock time from start to completion
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Number of distinct URLs checked
    pub fn total(&self) -> usize {
        self.alive.len() + self.dead.len()
    }

    /// Looks up the status recorded for `url`
    pub fn status_of(&self, url: &str) -> Option<VisitStatus> {
        if self.alive.iter().any(|u| u == url) {
            Some(VisitStatus::Alive)
        } else if self.dead.iter().any(|u| u == url) {
            Some(VisitStatus::Dead)
        } else {
            None
        }
    }

    /// Renders the report as printed to the console
    ///
    /// All alive URLs come first, then all dead URLs, then the elapsed time.
    pub fn render(&self) -> String {
        let mut out = String::new();

        for url in &self.alive {
            let _ = writeln!(out, "{} links: {}", VisitStatus::Alive, url);
        }
        for url in &self.dead {
            let _ = writeln!(out, "{} links: {}", VisitStatus::Dead, url);
        }
        let _ = writeln!(out, "Time taken: {:?}", self.elapsed);

        out
    }
}

/// Prints the report to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", report.render());
}
