//! State module for per-URL crawl outcomes
//!
//! - `VisitStatus`: the Alive/Dead classification recorded for every fetched URL

mod visit_status;

pub use visit_status::VisitStatus;
