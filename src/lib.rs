//! Structured content extraction from web pages: single-page scraping and
//! scope-limited, breadth-first site crawling.

pub mod config;
pub mod crawler;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod frontier;
pub mod parsers;
pub mod results;
pub mod scrape;
pub mod server;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{CrawlRequest, ScrapeRequest, ServiceConfig};
pub use crawler::crawl;
pub use error::{Error, Result};
pub use fetch::{BrowserFetcher, FetchError, FetchOptions, Fetcher};
pub use filter::{LinkScope, filter_links, normalize_url};
pub use results::{CrawlResult, CrawlStats, PageResult};
pub use scrape::scrape;
