//! The page fetcher contract the crawler consumes, and its WebDriver implementation.

pub mod browser;

pub use browser::BrowserFetcher;

use crate::results::PageResult;
use std::future::Future;
use thiserror::Error;

/// Options controlling a single page fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Load images and other assets and let client-side scripts settle
    pub render: bool,

    /// Capture a PNG screenshot of the rendered viewport
    pub screenshot: bool,

    /// Return the page's outbound links
    pub include_links: bool,

    /// CSS selector to wait for before reading the page
    pub wait_for: Option<String>,
}

/// Why one page could not be fetched or extracted
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not open a browser session: {0}")]
    Session(String),

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("timed out waiting for '{selector}' on {url}")]
    WaitFor { url: String, selector: String },

    #[error("fetching {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("screenshot of {url} failed: {message}")]
    Screenshot { url: String, message: String },

    #[error("invalid URL '{0}'")]
    InvalidUrl(String),
}

/// Turns one URL into one structured content record.
///
/// Implementations own their client resources per call; the crawler invokes
/// `fetch` at most once per URL and never concurrently.
pub trait Fetcher: Send + Sync {
    fn fetch(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> impl Future<Output = Result<PageResult, FetchError>> + Send;
}
