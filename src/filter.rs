use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

/// Paths ending in these extensions point at binary or static assets, not pages
static ASSET_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\.(png|jpe?g|gif|webp|svg|ico|bmp|tiff?|pdf|zip|gz|tgz|tar|rar|7z|exe|dmg|msi|iso|mp3|mp4|m4a|avi|mov|wmv|webm|ogg|wav|flac|woff2?|ttf|eot|otf|css|js|json|xml|rss|docx?|xlsx?|pptx?|apk)$",
    )
    .expect("asset extension pattern should be valid")
});

/// Link prefixes that never name a crawlable page
const SKIPPED_PREFIXES: [&str; 4] = ["mailto:", "javascript:", "tel:", "data:"];

/// Domain boundary within which a crawl may follow links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkScope {
    /// Host the crawl is limited to, without a leading `www.`
    base_domain: String,

    /// Whether hosts below the base domain are in scope
    #[serde(default)]
    allow_subdomains: bool,
}

impl LinkScope {
    /// Create a scope for `base_domain`; a leading `www.` is dropped
    pub fn new(base_domain: &str, allow_subdomains: bool) -> Self {
        Self {
            base_domain: strip_www(&base_domain.to_ascii_lowercase()).to_string(),
            allow_subdomains,
        }
    }

    /// Derive the scope from a seed URL's host
    pub fn from_url(url: &Url, allow_subdomains: bool) -> Option<Self> {
        let host = url.host_str().filter(|h| !h.is_empty())?;
        Some(Self::new(host, allow_subdomains))
    }

    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    pub fn allow_subdomains(&self) -> bool {
        self.allow_subdomains
    }

    /// Check whether an absolute URL falls inside this scope and is not an asset
    pub fn should_crawl(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        if !self.is_in_domain_scope(url) {
            return false;
        }

        !ASSET_EXTENSION.is_match(url.path())
    }

    /// Narrow raw hyperlinks found on `current_page` to normalized in-scope URLs
    pub fn filter_links<I>(&self, raw_links: I, current_page: &Url) -> BTreeSet<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut accepted = BTreeSet::new();

        for raw in raw_links {
            // Resolve against the current page, dropping pseudo-URLs
            let Some(resolved) = resolve_link(current_page, raw.as_ref()) else {
                continue;
            };

            // Check scheme, domain scope and asset extensions
            if !self.should_crawl(&resolved) {
                ::log::trace!("Link out of scope: {}", resolved);
                continue;
            }

            accepted.insert(normalize_url(&resolved));
        }

        accepted
    }

    fn is_in_domain_scope(&self, url: &Url) -> bool {
        // Check the host, ignoring a leading www.
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = strip_www(host);

        if host == self.base_domain {
            return true;
        }

        // Check subdomains on a label boundary
        self.allow_subdomains
            && host
                .strip_suffix(self.base_domain.as_str())
                .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.'))
    }
}

/// Filter raw links against a base domain; malformed links are dropped silently
pub fn filter_links<I>(
    raw_links: I,
    current_page: &Url,
    base_domain: &str,
    allow_subdomains: bool,
) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    LinkScope::new(base_domain, allow_subdomains).filter_links(raw_links, current_page)
}

/// Canonical string form used for deduplication.
///
/// Drops the fragment and a trailing slash on non-root paths; keeps the query.
pub fn normalize_url(url: &Url) -> String {
    let mut normalized = url.clone();
    normalized.set_fragment(None);

    let path = normalized.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed }.to_string();
        normalized.set_path(&trimmed);
    }

    normalized.to_string()
}

/// Resolve a raw href against the page it was found on
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
        return None;
    }

    base.join(href).ok()
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
