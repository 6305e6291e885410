use crate::url::LinkBase;
use serde::Deserialize;

/// Seed used when neither the command line nor a config file names one
pub const DEFAULT_SEED: &str = "https://scrape-me.dreamsofcode.io/";

/// Main configuration structure for link-sweep
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Creates a default configuration crawling `seed`
    pub fn for_seed(seed: impl Into<String>) -> Self {
        Self {
            crawler: CrawlerConfig {
                seed: seed.into(),
                ..CrawlerConfig::default()
            },
            http: HttpConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrawlerConfig {
    /// The page the crawl starts from
    #[serde(default = "default_seed")]
    pub seed: String,

    /// Maximum number of concurrent page fetches (unbounded when absent)
    #[serde(rename = "max-concurrency", default)]
    pub max_concurrency: Option<usize>,

    /// What relative hrefs are resolved against
    #[serde(rename = "resolve-against", default)]
    pub resolve_against: LinkBase,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            max_concurrency: None,
            resolve_against: LinkBase::Root,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// User-Agent header sent with every request (client default when absent)
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,

    /// Per-request timeout in milliseconds (no timeout when absent)
    #[serde(rename = "request-timeout-ms", default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_seed() -> String {
    DEFAULT_SEED.to_string()
}
