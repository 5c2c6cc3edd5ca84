use serde::{Deserialize, Serialize};

/// Structured content extracted from one fetched page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    /// Title of the page
    pub title: String,

    /// Cleaned main content as Markdown
    pub content: String,

    /// Cleaned main content as plain text
    pub text_content: String,

    /// Author, if the page declares one
    pub byline: Option<String>,

    /// Publisher or site name, if the page declares one
    pub site_name: Option<String>,

    /// Final URL of the page after redirects
    pub url: String,

    /// Base64-encoded PNG screenshot, when requested
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub screenshot: Option<String>,

    /// Raw hyperlink targets found on the page, in document order
    #[serde(default)]
    pub links: Vec<String>,

    /// Opaque structured metadata embedded by the page (JSON-LD)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<serde_json::Value>,
}

impl PageResult {
    /// Create a page result with only a URL and title; remaining fields empty
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: String::new(),
            text_content: String::new(),
            byline: None,
            site_name: None,
            url: url.into(),
            screenshot: None,
            links: Vec::new(),
            metadata: None,
        }
    }

    /// Attach discovered links
    pub fn with_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.links = links.into_iter().map(Into::into).collect();
        self
    }
}

/// Aggregate statistics for one crawl run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlStats {
    pub pages_scraped: usize,
    pub links_discovered: usize,
    pub duration_seconds: f64,
}

/// A page the crawler dequeued but could not fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageError {
    pub url: String,
    pub error: String,
}

/// Output of a crawl: pages in fetch order plus run statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    pub pages: Vec<PageResult>,
    pub stats: CrawlStats,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<PageError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_result_serializes_camel_case() {
        let result = CrawlResult {
            pages: vec![PageResult::new("https://example.com/", "Home")],
            stats: CrawlStats {
                pages_scraped: 1,
                links_discovered: 3,
                duration_seconds: 0.5,
            },
            errors: Vec::new(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["stats"]["pagesScraped"], 1);
        assert_eq!(json["stats"]["linksDiscovered"], 3);
        assert_eq!(json["pages"][0]["textContent"], "");
        assert!(json["pages"][0].get("screenshot").is_none());
        assert!(json.get("errors").is_none());
    }
}
