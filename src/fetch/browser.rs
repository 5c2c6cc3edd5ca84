use super::{FetchError, FetchOptions, Fetcher};
use crate::config::ServiceConfig;
use crate::parsers::Parser;
use crate::results::PageResult;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::time::{Duration, Instant};

/// Tried in order when the configured WebDriver refuses a session
const FALLBACK_WEBDRIVER_URLS: [&str; 3] = [
    "http://localhost:9515", // ChromeDriver default
    "http://127.0.0.1:4444", // IP instead of localhost
    "http://localhost:4723", // Appium default
];

/// Upper bound on waiting for a `wait_for` selector
const WAIT_FOR_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches pages by driving a browser through a WebDriver server.
///
/// Every fetch opens its own session and closes it before returning, whether
/// the fetch succeeded, failed, or timed out.
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    webdriver_url: String,
    headless: bool,
    page_timeout: Duration,
    settle: Duration,
}

impl BrowserFetcher {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self::from_config(&ServiceConfig {
            webdriver_url: webdriver_url.into(),
            ..ServiceConfig::default()
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            headless: config.headless,
            page_timeout: Duration::from_secs(config.page_timeout_secs),
            settle: Duration::from_millis(config.settle_ms),
        }
    }

    /// Chrome capabilities; without `render`, images are not loaded
    fn capabilities(&self, render: bool) -> Map<String, Value> {
        let mut args = vec![
            "--no-sandbox",
            "--disable-gpu",
            "--disable-dev-shm-usage",
            "--window-size=1366,768",
            "--disable-blink-features=AutomationControlled",
        ];
        if self.headless {
            args.push("--headless=new");
        }

        let mut chrome = json!({ "args": args });
        if !render {
            chrome["prefs"] = json!({ "profile.managed_default_content_settings.images": 2 });
        }

        let mut caps = Map::new();
        caps.insert("goog:chromeOptions".to_string(), chrome);
        caps
    }

    /// Opens a session on the configured WebDriver, then on common local fallbacks
    async fn connect(&self, render: bool) -> Result<Client, FetchError> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities(render));

        let first_error = match builder.connect(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                return Ok(client);
            }
            Err(e) => {
                ::log::warn!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
                e.to_string()
            }
        };

        for url in FALLBACK_WEBDRIVER_URLS {
            if url == self.webdriver_url {
                continue;
            }
            ::log::debug!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = builder.connect(url).await {
                ::log::info!("Connected to fallback WebDriver at {}", url);
                return Ok(client);
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(FetchError::Session(first_error))
    }
}

impl Fetcher for BrowserFetcher {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<PageResult, FetchError> {
        if url::Url::parse(url).is_err() {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        let started = Instant::now();
        let deadline = tokio::time::Instant::now() + self.page_timeout;
        let timed_out = || FetchError::Timeout {
            url: url.to_string(),
            seconds: self.page_timeout.as_secs(),
        };

        // Session creation counts against the page timeout
        let client = match tokio::time::timeout_at(deadline, self.connect(options.render)).await {
            Ok(client) => client?,
            Err(_) => {
                ::log::warn!("Timed out opening a WebDriver session for {}", url);
                return Err(timed_out());
            }
        };

        let outcome =
            tokio::time::timeout_at(deadline, scrape(&client, url, options, self.settle)).await;

        if let Err(e) = client.close().await {
            ::log::warn!("Failed to close WebDriver session for {}: {}", url, e);
        }

        let result = outcome.unwrap_or_else(|_| Err(timed_out()));

        ::log::debug!(
            "Fetched {} in {:.2} seconds (ok: {})",
            url,
            started.elapsed().as_secs_f64(),
            result.is_ok()
        );
        result
    }
}

/// Navigates an open session to `url` and extracts the page
async fn scrape(
    client: &Client,
    url: &str,
    options: &FetchOptions,
    settle: Duration,
) -> Result<PageResult, FetchError> {
    client
        .goto(url)
        .await
        .map_err(|e| navigation_error(e, "navigating to", url))?;

    if let Some(selector) = options.wait_for.as_deref() {
        client
            .wait()
            .at_most(WAIT_FOR_TIMEOUT)
            .for_element(Locator::Css(selector))
            .await
            .map_err(|_| FetchError::WaitFor {
                url: url.to_string(),
                selector: selector.to_string(),
            })?;
    }

    if options.render && !settle.is_zero() {
        tokio::time::sleep(settle).await;
    }

    let source = client
        .source()
        .await
        .map_err(|e| navigation_error(e, "reading source of", url))?;

    let final_url = match client.current_url().await {
        Ok(current) => current.to_string(),
        Err(e) => {
            ::log::debug!("Could not read final URL of {}: {}", url, e);
            url.to_string()
        }
    };

    let screenshot = if options.screenshot {
        let png = client.screenshot().await.map_err(|e| FetchError::Screenshot {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Some(STANDARD.encode(png))
    } else {
        None
    };

    let extracted = Parser::parse_from_url(&source, &final_url);
    ::log::info!("Found {} links in {}", extracted.links.len(), final_url);

    Ok(PageResult {
        title: extracted.title,
        content: extracted.content,
        text_content: extracted.text_content,
        byline: extracted.byline,
        site_name: extracted.site_name,
        url: final_url,
        screenshot,
        links: if options.include_links {
            extracted.links
        } else {
            Vec::new()
        },
        metadata: extracted.metadata,
    })
}

fn navigation_error(error: CmdError, context: &str, url: &str) -> FetchError {
    let message = error.to_string();
    if message.contains("Unable to find session") || message.contains("invalid session id") {
        ::log::warn!("Lost WebDriver session while {} {}", context, url);
    } else {
        ::log::debug!("Failed {} {}: {}", context, url, message);
    }
    FetchError::Navigation {
        url: url.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_disable_images_without_render() {
        let fetcher = BrowserFetcher::new("http://localhost:4444");

        let lean = fetcher.capabilities(false);
        assert_eq!(
            lean["goog:chromeOptions"]["prefs"]["profile.managed_default_content_settings.images"],
            2
        );

        let rendered = fetcher.capabilities(true);
        assert!(rendered["goog:chromeOptions"].get("prefs").is_none());
        let args = rendered["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a == "--headless=new"));
    }

    #[tokio::test]
    async fn test_unresponsive_webdriver_times_out() {
        // Accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let fetcher = BrowserFetcher::from_config(&ServiceConfig {
            webdriver_url: format!("http://{}", addr),
            page_timeout_secs: 1,
            ..ServiceConfig::default()
        });

        let err = tokio::time::timeout(
            Duration::from_secs(10),
            fetcher.fetch("https://example.com/", &FetchOptions::default()),
        )
        .await
        .expect("fetch should give up on its own")
        .unwrap_err();
        assert!(
            matches!(err, FetchError::Timeout { seconds: 1, .. }),
            "unexpected error: {}",
            err
        );
    }

    #[tokio::test]
    async fn test_rejects_invalid_url_without_connecting() {
        let fetcher = BrowserFetcher::new("http://127.0.0.1:1");
        let err = fetcher
            .fetch("not a url", &FetchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
