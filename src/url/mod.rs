//! URL handling module for link-sweep
//!
//! This module decides which hrefs belong to the crawled site and turns
//! them into absolute URL keys.

mod scope;
mod site;

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

// Re-export main types and functions
pub use scope::LinkClassifier;
pub use site::{same_site, site_label};

/// What a relative href is resolved against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkBase {
    /// Every relative href is rooted at the seed URL, whichever page held it
    #[default]
    Root,
    /// Relative hrefs resolve against the page that contains them
    Page,
}

impl FromStr for LinkBase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "root" => Ok(Self::Root),
            "page" => Ok(Self::Page),
            other => Err(format!(
                "unknown link base '{}', expected 'root' or 'page'",
                other
            )),
        }
    }
}

impl fmt::Display for LinkBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("root"),
            Self::Page => f.write_str("page"),
        }
    }
}
