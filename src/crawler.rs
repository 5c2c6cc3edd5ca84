//! Breadth-first site crawler bounded by page count, depth and domain scope.

use crate::config::CrawlRequest;
use crate::error::{Error, Result};
use crate::fetch::{FetchOptions, Fetcher};
use crate::filter::{LinkScope, normalize_url};
use crate::frontier::{Frontier, FrontierEntry};
use crate::results::{CrawlResult, CrawlStats, PageError, PageResult};
use std::time::Instant;
use url::Url;

/// Crawls from `request.start_url`, fetching one page at a time.
///
/// URLs are marked visited when dequeued, so a URL may be queued by several
/// pages but is fetched at most once. Pages at `max_depth` are fetched but
/// never expanded. Fetch failures are recorded in `CrawlResult::errors`; only
/// a start URL without a usable host fails the whole crawl.
pub async fn crawl<F: Fetcher>(fetcher: &F, request: &CrawlRequest) -> Result<CrawlResult> {
    let started = Instant::now();

    let start = Url::parse(&request.start_url).map_err(|e| Error::InvalidStartUrl {
        url: request.start_url.clone(),
        reason: e.to_string(),
    })?;
    if !matches!(start.scheme(), "http" | "https") {
        return Err(Error::InvalidStartUrl {
            url: request.start_url.clone(),
            reason: format!("unsupported scheme '{}'", start.scheme()),
        });
    }
    let scope = LinkScope::from_url(&start, request.allow_subdomains).ok_or_else(|| {
        Error::InvalidStartUrl {
            url: request.start_url.clone(),
            reason: "URL has no host".to_string(),
        }
    })?;

    ::log::info!(
        "Starting crawl of {} (max_pages={}, max_depth={}, scope={}{})",
        start,
        request.max_pages,
        request.max_depth,
        scope.base_domain(),
        if scope.allow_subdomains() { " +subdomains" } else { "" }
    );

    let options = FetchOptions {
        render: request.render,
        screenshot: request.screenshot,
        include_links: true,
        wait_for: None,
    };
    let queue_cap = request.max_pages.saturating_mul(2);

    let mut frontier = Frontier::seed(normalize_url(&start));
    let mut pages: Vec<PageResult> = Vec::new();
    let mut errors = Vec::new();
    let mut links_discovered = 0;

    while pages.len() < request.max_pages {
        let Some(FrontierEntry { url, depth }) = frontier.pop() else {
            break;
        };

        // Check the entry was not fetched already and is within depth
        if depth > request.max_depth || !frontier.mark_visited(&url) {
            ::log::trace!("Skipping already visited or too deep: {}", url);
            continue;
        }

        ::log::debug!("Crawling [depth {}]: {}", depth, url);
        // Failed fetches are recorded and the crawl moves on
        let page = match fetcher.fetch(&url, &options).await {
            Ok(page) => page,
            Err(e) => {
                ::log::warn!("Failed to fetch {}: {}", url, e);
                errors.push(PageError {
                    url,
                    error: e.to_string(),
                });
                continue;
            }
        };

        // A redirect may land on a page that was already fetched under another URL.
        let landed = Url::parse(&page.url).map(|u| normalize_url(&u)).ok();
        if let Some(landed) = landed.filter(|landed| *landed != url) {
            if !frontier.mark_visited(&landed) {
                ::log::debug!("{} redirected to already visited {}", url, landed);
                continue;
            }
        }

        // Pages at max depth are kept but not expanded
        let links = if depth < request.max_depth {
            let base = Url::parse(&page.url)
                .or_else(|_| Url::parse(&url))
                .unwrap_or_else(|_| start.clone());
            Some(scope.filter_links(&page.links, &base))
        } else {
            None
        };
        pages.push(page);

        let Some(links) = links else {
            continue;
        };
        links_discovered += links.len();

        let mut queued = 0;
        for link in links {
            // Check the frontier cap before queueing
            if pages.len() + frontier.len() >= queue_cap {
                ::log::debug!("Frontier cap of {} reached, dropping remaining links", queue_cap);
                break;
            }
            if frontier.is_visited(&link) {
                continue;
            }
            frontier.push(FrontierEntry::new(link, depth + 1));
            queued += 1;
        }
        ::log::debug!("Queued {} links from {}", queued, url);
    }

    let stats = CrawlStats {
        pages_scraped: pages.len(),
        links_discovered,
        duration_seconds: started.elapsed().as_secs_f64(),
    };

    ::log::info!(
        "Crawl complete - {} pages, {} links discovered, {} URLs visited, {} failures in {:.2} seconds",
        stats.pages_scraped,
        stats.links_discovered,
        frontier.visited_count(),
        errors.len(),
        stats.duration_seconds
    );

    Ok(CrawlResult {
        pages,
        stats,
        errors,
    })
}
