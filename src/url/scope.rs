//! In-scope classification and resolution of anchor hrefs

use super::site::same_site;
use super::LinkBase;
use crate::{UrlError, UrlResult};
use url::{ParseError, Url};

/// Decides which hrefs belong to the crawled site and resolves them
///
/// The classifier is built once from the seed URL and never changes during
/// a crawl, so it is shared read-only between all visit tasks.
///
/// # In-scope rules (root mode)
///
/// Applied in order:
///
/// 1. An empty href is in scope and resolves to the seed itself.
/// 2. An absolute URL on the seed's host (and port) is in scope.
/// 3. An href starting with `/` is in scope.
/// 4. Anything else is out of scope: other hosts, `mailto:`,
///    `javascript:`, bare relative paths and unparseable hrefs.
///
/// Rule 3 is purely textual, so `//other.com/x` is in scope and its path is
/// rooted at the seed like any other. A resolved URL that still lands on a
/// different host is dropped by [`LinkClassifier::classify`].
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    seed: Url,
    link_base: LinkBase,
}

impl LinkClassifier {
    /// Creates a classifier for the site rooted at `seed`
    ///
    /// # Returns
    ///
    /// * `Ok(LinkClassifier)` - The seed is an http(s) URL with a host
    /// * `Err(UrlError)` - The seed cannot anchor a crawl
    pub fn new(seed: Url, link_base: LinkBase) -> UrlResult<Self> {
        if seed.scheme() != "http" && seed.scheme() != "https" {
            return Err(UrlError::InvalidScheme(seed.scheme().to_string()));
        }
        if seed.host_str().is_none() {
            return Err(UrlError::MissingHost(seed.to_string()));
        }

        Ok(Self { seed, link_base })
    }

    /// Parses `seed` and creates a classifier for it
    pub fn from_seed(seed: &str, link_base: LinkBase) -> UrlResult<Self> {
        Self::new(Url::parse(seed)?, link_base)
    }

    /// The seed URL every root-relative href is joined onto
    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// The configured resolution mode
    pub fn link_base(&self) -> LinkBase {
        self.link_base
    }

    /// Returns true if `href`, found on `page`, belongs to the crawled site
    ///
    /// `page` is only consulted in [`LinkBase::Page`] mode.
    pub fn is_in_scope(&self, href: &str, page: &Url) -> bool {
        match self.link_base {
            LinkBase::Root => self.is_root_scoped(href),
            LinkBase::Page => page
                .join(href)
                .map(|resolved| is_web_url(&resolved) && same_site(&resolved, &self.seed))
                .unwrap_or(false),
        }
    }

    /// Resolves `href`, found on `page`, to an absolute URL
    ///
    /// In root mode the href's path is appended to the seed's path and dot
    /// segments are removed, so `/about` found anywhere on a site seeded at
    /// `https://example.com/docs/` becomes `https://example.com/docs/about`.
    /// The href's query and fragment are kept as written.
    pub fn resolve(&self, href: &str, page: &Url) -> UrlResult<Url> {
        match self.link_base {
            LinkBase::Root => self.resolve_from_seed(href),
            LinkBase::Page => Ok(page.join(href)?),
        }
    }

    /// Classifies and resolves in one step
    ///
    /// # Returns
    ///
    /// * `Ok(Some(url))` - In-scope href and its absolute URL key
    /// * `Ok(None)` - Out-of-scope href, or one that resolves off the site
    /// * `Err(UrlError)` - In-scope href that could not be resolved
    ///
    /// URL parsing treats `\` as `/` and strips tabs and newlines, so an
    /// href such as `/\other.com/x` passes the textual check yet resolves to
    /// another host. Those are dropped here.
    pub fn classify(&self, href: &str, page: &Url) -> UrlResult<Option<Url>> {
        if !self.is_in_scope(href, page) {
            return Ok(None);
        }

        let resolved = self.resolve(href, page)?;
        if !same_site(&resolved, &self.seed) {
            tracing::debug!("Dropping {:?}: resolves off-site to {}", href, resolved);
            return Ok(None);
        }

        Ok(Some(resolved))
    }

    fn is_root_scoped(&self, href: &str) -> bool {
        if href.is_empty() {
            return true;
        }

        match Url::parse(href) {
            Ok(parsed) => same_site(&parsed, &self.seed),
            Err(ParseError::RelativeUrlWithoutBase) => href.starts_with('/'),
            Err(_) => false,
        }
    }

    fn resolve_from_seed(&self, href: &str) -> UrlResult<Url> {
        if href.is_empty() {
            return Ok(self.seed.clone());
        }

        if let Ok(absolute) = Url::parse(href) {
            return Ok(absolute);
        }

        let base_path = self.seed.path().trim_end_matches('/');
        let rest = href.trim_start_matches('/');
        let rooted = format!("{}/{}", base_path, rest);

        Ok(self.seed.join(&rooted)?)
    }
}

fn is_web_url(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}
