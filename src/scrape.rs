use crate::config::ScrapeRequest;
use crate::error::{Error, Result};
use crate::fetch::{FetchOptions, Fetcher};
use crate::results::PageResult;
use url::Url;

/// Fetches and extracts a single page
pub async fn scrape<F: Fetcher>(fetcher: &F, request: &ScrapeRequest) -> Result<PageResult> {
    let url = Url::parse(&request.url).map_err(|e| Error::InvalidUrl {
        url: request.url.clone(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl {
            url: request.url.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    let options = FetchOptions {
        render: request.render,
        screenshot: request.screenshot,
        include_links: request.include_links,
        wait_for: request.wait_for.clone().filter(|s| !s.trim().is_empty()),
    };

    ::log::info!("Scraping {}", url);
    let mut page = fetcher.fetch(url.as_str(), &options).await?;
    if !request.include_links {
        page.links.clear();
    }
    Ok(page)
}
