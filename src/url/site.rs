use url::Url;

/// Returns true if both URLs point at the same site
///
/// Two URLs are on the same site when their host and explicit port match.
/// The scheme is ignored, so `http://example.com/` and
/// `https://example.com/` count as one site.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use link_sweep::url::same_site;
///
/// let a = Url::parse("https://example.com/a").unwrap();
/// let b = Url::parse("http://example.com/b?q=1").unwrap();
/// assert!(same_site(&a, &b));
///
/// let c = Url::parse("https://other.com/").unwrap();
/// assert!(!same_site(&a, &c));
/// ```
pub fn same_site(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(left), Some(right)) => left == right && a.port() == b.port(),
        _ => false,
    }
}

/// Formats the host (and explicit port) of a URL for log output
pub fn site_label(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => url.as_str().to_string(),
    }
}
