/// Visit status definitions for crawled URLs
///
/// Each URL key receives exactly one status, assigned when its response
/// arrives and never changed afterwards.
use reqwest::StatusCode;
use std::fmt;

/// The terminal classification of a fetched URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitStatus {
    /// The response status was exactly 200
    Alive,

    /// The response completed with any other status
    Dead,
}

impl VisitStatus {
    /// Classifies a completed response by its status code
    ///
    /// Only `200 OK` counts as alive. Other 2xx codes, unfollowed redirects
    /// and every error status are dead.
    pub fn from_status(status: StatusCode) -> Self {
        if status == StatusCode::OK {
            Self::Alive
        } else {
            Self::Dead
        }
    }

    /// Returns true if this URL answered with 200
    pub fn is_alive(&self) -> bool {
        matches!(self, Self::Alive)
    }

    /// Returns the label used in the console report
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alive => "Alive",
            Self::Dead => "Dead",
        }
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
