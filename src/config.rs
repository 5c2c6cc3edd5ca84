use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the browser fetcher and the HTTP service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Address the HTTP service listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Upper bound on a single page fetch, in seconds
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,

    /// Time given to client-side rendering when `render` is set, in milliseconds
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Run the browser without a window
    #[serde(default = "default_true")]
    pub headless: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            bind_addr: default_bind_addr(),
            page_timeout_secs: default_page_timeout_secs(),
            settle_ms: default_settle_ms(),
            headless: true,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Override the WebDriver URL from `WEBDRIVER_URL` when it is set and non-empty
    pub fn with_env(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_timeout_secs == 0 {
            return Err(Error::Config("page_timeout_secs must be positive".into()));
        }
        url::Url::parse(&self.webdriver_url).map_err(|e| {
            Error::Config(format!("invalid webdriver_url '{}': {}", self.webdriver_url, e))
        })?;
        Ok(())
    }
}

/// Parameters of one crawl run; fixed for the duration of the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRequest {
    /// URL to start crawling from
    #[serde(rename = "url", alias = "startUrl")]
    pub start_url: String,

    /// Maximum number of pages to return
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum number of link hops from the start URL
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Follow links into subdomains of the start URL's domain
    #[serde(default)]
    pub allow_subdomains: bool,

    /// Load page assets and wait for client-side rendering
    #[serde(default)]
    pub render: bool,

    /// Capture a screenshot of every page
    #[serde(default)]
    pub screenshot: bool,
}

impl CrawlRequest {
    /// Create a request with default bounds
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            max_pages: default_max_pages(),
            max_depth: default_max_depth(),
            allow_subdomains: false,
            render: false,
            screenshot: false,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_subdomains(mut self, allow: bool) -> Self {
        self.allow_subdomains = allow;
        self
    }

    pub fn with_render(mut self, render: bool) -> Self {
        self.render = render;
        self
    }

    pub fn with_screenshot(mut self, screenshot: bool) -> Self {
        self.screenshot = screenshot;
        self
    }
}

/// Parameters of a single-page scrape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub url: String,

    #[serde(default)]
    pub render: bool,

    #[serde(default)]
    pub screenshot: bool,

    /// CSS selector to wait for before extracting
    #[serde(default)]
    pub wait_for: Option<String>,

    #[serde(default = "default_true")]
    pub include_links: bool,
}

impl ScrapeRequest {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            render: false,
            screenshot: false,
            wait_for: None,
            include_links: true,
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_page_timeout_secs() -> u64 {
    45
}

fn default_settle_ms() -> u64 {
    1500
}

fn default_max_pages() -> usize {
    10
}

fn default_max_depth() -> usize {
    2
}

fn default_true() -> bool {
    true
}
