//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client from configuration
//! - Sending the GET request for a page
//! - Reading the response body for HTML parsing
//!
//! Redirects follow reqwest's default policy, so the status that gets
//! classified is the one at the end of the redirect chain.

use crate::config::HttpConfig;
use crate::SweepError;
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use link_sweep::config::HttpConfig;
/// use link_sweep::crawler::build_http_client;
///
/// let config = HttpConfig {
///     user_agent: Some("link-sweep/0.1".to_string()),
///     request_timeout_ms: Some(30_000),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().gzip(true).brotli(true);

    if let Some(agent) = &config.user_agent {
        builder = builder.user_agent(agent.as_str());
    }

    if let Some(ms) = config.request_timeout_ms {
        builder = builder.timeout(Duration::from_millis(ms));
    }

    builder.build()
}

/// Sends a GET request for `url`
///
/// Any completed response is returned whatever its status. Failing to get a
/// response at all (DNS, refused connection, TLS, timeout) is a transport
/// error and is reported as [`SweepError::Http`].
pub async fn fetch_url(client: &Client, url: &Url) -> Result<Response, SweepError> {
    client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| SweepError::Http {
            url: url.to_string(),
            source,
        })
}

/// Reads a response body as HTML text
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected; the HTML
/// parser tolerates anything. A body that cannot be read to the end is
/// reported as [`SweepError::HtmlParse`] since no document can be built.
pub async fn read_html(response: Response, url: &Url) -> Result<String, SweepError> {
    let bytes = response.bytes().await.map_err(|e| SweepError::HtmlParse {
        url: url.to_string(),
        message: format!("failed to read response body: {}", e),
    })?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
