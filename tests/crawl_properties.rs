use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use url::Url;
use webextract::{CrawlRequest, Error, FetchError, FetchOptions, Fetcher, PageResult, crawl, filter_links};

/// In-memory site: URL -> outbound links. URLs listed in `failing` error out.
#[derive(Default)]
struct FakeSite {
    pages: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    fetched: Mutex<Vec<String>>,
}

impl FakeSite {
    fn page(mut self, url: &str, links: &[&str]) -> Self {
        self.pages
            .insert(url.to_string(), links.iter().map(|s| s.to_string()).collect());
        self
    }

    fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    /// Link depth of every page reachable from `start`, by BFS over the fake graph
    fn hop_distances(&self, start: &str) -> HashMap<String, usize> {
        let mut distances = HashMap::from([(start.to_string(), 0)]);
        let mut queue = std::collections::VecDeque::from([start.to_string()]);
        while let Some(url) = queue.pop_front() {
            let base = Url::parse(&url).unwrap();
            let links = self.pages.get(&url).cloned().unwrap_or_default();
            for link in filter_links(&links, &base, "example.com", true) {
                if !distances.contains_key(&link) {
                    distances.insert(link.clone(), distances[&url] + 1);
                    queue.push_back(link);
                }
            }
        }
        distances
    }
}

impl Fetcher for FakeSite {
    async fn fetch(&self, url: &str, _options: &FetchOptions) -> Result<PageResult, FetchError> {
        self.fetched.lock().unwrap().push(url.to_string());
        if self.failing.contains(url) {
            return Err(FetchError::Navigation {
                url: url.to_string(),
                message: "net::ERR_CONNECTION_RESET".to_string(),
            });
        }
        match self.pages.get(url) {
            Some(links) => Ok(PageResult::new(url, "page").with_links(links.clone())),
            None => Err(FetchError::Navigation {
                url: url.to_string(),
                message: "404".to_string(),
            }),
        }
    }
}

/// A dense, cyclic site: every page links to ten others plus the root
fn dense_site() -> FakeSite {
    let mut site = FakeSite::default();
    for i in 0..40 {
        let links: Vec<String> = (1..=10)
            .map(|k| format!("/p{}", (i * 3 + k) % 40))
            .chain(["/".to_string(), "#top".to_string(), "https://other.com/".to_string()])
            .collect();
        let links: Vec<&str> = links.iter().map(String::as_str).collect();
        let url = if i == 0 {
            "https://example.com/".to_string()
        } else {
            format!("https://example.com/p{}", i)
        };
        site = site.page(&url, &links);
    }
    site
}

#[tokio::test]
async fn page_bound_is_respected() {
    for max_pages in [0, 1, 3, 7, 25] {
        let site = dense_site();
        let request = CrawlRequest::new("https://example.com/")
            .with_max_pages(max_pages)
            .with_max_depth(10);
        let result = crawl(&site, &request).await.unwrap();
        assert!(result.pages.len() <= max_pages);
        assert_eq!(result.stats.pages_scraped, result.pages.len());
    }
}

#[tokio::test]
async fn pages_are_never_duplicated() {
    let site = dense_site();
    let request = CrawlRequest::new("https://example.com")
        .with_max_pages(30)
        .with_max_depth(10);
    let result = crawl(&site, &request).await.unwrap();

    let urls: HashSet<_> = result.pages.iter().map(|p| p.url.clone()).collect();
    assert_eq!(urls.len(), result.pages.len());

    let fetched = site.fetched();
    let unique: HashSet<_> = fetched.iter().collect();
    assert_eq!(unique.len(), fetched.len(), "a URL was fetched twice");
}

#[tokio::test]
async fn depth_bound_is_respected() {
    for max_depth in 0..4 {
        let site = dense_site();
        let distances = site.hop_distances("https://example.com/");
        let request = CrawlRequest::new("https://example.com/")
            .with_max_pages(40)
            .with_max_depth(max_depth);
        let result = crawl(&site, &request).await.unwrap();

        for page in &result.pages {
            assert!(
                distances[&page.url] <= max_depth,
                "{} is {} hops away with max_depth {}",
                page.url,
                distances[&page.url],
                max_depth
            );
        }
    }
}

#[tokio::test]
async fn depth_zero_fetches_only_the_start_page() {
    let site = dense_site();
    let request = CrawlRequest::new("https://example.com/").with_max_depth(0);
    let result = crawl(&site, &request).await.unwrap();

    assert_eq!(result.pages.len(), 1);
    assert_eq!(result.pages[0].url, "https://example.com/");
    assert_eq!(result.stats.links_discovered, 0);
    assert_eq!(site.fetched(), vec!["https://example.com/"]);
}

#[tokio::test]
async fn per_page_failure_does_not_abort() {
    let site = FakeSite::default()
        .page("https://example.com/", &["/1", "/2", "/3", "/4"])
        .page("https://example.com/1", &[])
        .page("https://example.com/2", &[])
        .page("https://example.com/3", &[])
        .page("https://example.com/4", &[])
        .failing("https://example.com/2");

    let result = crawl(&site, &CrawlRequest::new("https://example.com/"))
        .await
        .unwrap();

    let urls: Vec<_> = result.pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://example.com/",
            "https://example.com/1",
            "https://example.com/3",
            "https://example.com/4",
        ]
    );
    assert_eq!(result.stats.pages_scraped, 4);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].url, "https://example.com/2");
    assert!(result.errors[0].error.contains("ERR_CONNECTION_RESET"));
}

#[tokio::test]
async fn failed_start_page_yields_empty_result() {
    let site = FakeSite::default().failing("https://example.com/");
    let result = crawl(&site, &CrawlRequest::new("https://example.com/"))
        .await
        .unwrap();
    assert!(result.pages.is_empty());
    assert_eq!(result.errors.len(), 1);
}

#[tokio::test]
async fn links_discovered_sums_filtered_links_of_expanded_pages() {
    let site = FakeSite::default()
        .page(
            "https://example.com/",
            &["/a", "/a#x", "/b/", "https://other.com/", "/logo.png", "mailto:a@b.c"],
        )
        .page("https://example.com/a", &["/", "/c"])
        .page("https://example.com/b", &["/c", "https://blog.example.com/"])
        .page("https://example.com/c", &["/d"]);

    let request = CrawlRequest::new("https://example.com/").with_max_depth(1);
    let result = crawl(&site, &request).await.unwrap();

    // Only the root is expanded: {/a, /b}
    assert_eq!(result.stats.links_discovered, 2);
    assert_eq!(result.pages.len(), 3);

    let request = CrawlRequest::new("https://example.com/").with_max_depth(2);
    let result = crawl(&site, &request).await.unwrap();

    // Root {/a, /b} + /a {/, /c} + /b {/c}; /c sits at max depth
    assert_eq!(result.stats.links_discovered, 5);
    assert_eq!(result.pages.len(), 4);
}

#[tokio::test]
async fn subdomains_followed_only_when_allowed() {
    let site = FakeSite::default()
        .page("https://www.example.com/", &["https://blog.example.com/post"])
        .page("https://blog.example.com/post", &[]);

    let result = crawl(&site, &CrawlRequest::new("https://www.example.com/"))
        .await
        .unwrap();
    assert_eq!(result.pages.len(), 1);

    let request = CrawlRequest::new("https://www.example.com/").with_subdomains(true);
    let result = crawl(&site, &request).await.unwrap();
    assert_eq!(result.pages.len(), 2);
}

#[tokio::test]
async fn unparsable_start_url_is_rejected() {
    let site = FakeSite::default();
    for bad in ["", "example.com/no-scheme", "javascript:alert(1)"] {
        let err = crawl(&site, &CrawlRequest::new(bad)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidStartUrl { .. }), "{:?}", bad);
        assert!(err.to_string().contains("invalid start URL"));
    }
    assert!(site.fetched().is_empty());
}
