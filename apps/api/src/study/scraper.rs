//! Web content fetcher for `/api/analyze-url`.
//!
//! Failures are reported in-band: `scrape` always returns text, and a failed
//! fetch becomes `"Error scraping website: <cause>"` so one bad URL does not
//! sink a multi-URL analysis.

use std::time::Duration;

use reqwest::header::USER_AGENT;
use reqwest::Client;
use tracing::{debug, warn};

use crate::study::markup::html_to_text;

pub const SCRAPE_TIMEOUT: Duration = Duration::from_secs(10);
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const SCRAPE_ERROR_PREFIX: &str = "Error scraping website";

#[derive(Clone)]
pub struct WebScraper {
    client: Client,
}

impl WebScraper {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(SCRAPE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    /// Fetches `url` and returns its visible text, or an error description.
    pub async fn scrape(&self, url: &str) -> String {
        let url = normalize_url(url);
        match self.fetch_text(&url).await {
            Ok(text) => text,
            Err(e) => {
                warn!(url = %url, error = %e, "Scrape failed");
                format!("{SCRAPE_ERROR_PREFIX}: {e}")
            }
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, reqwest::Error> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;
        // Error pages are scraped like any other page.
        debug!(url = %url, status = %response.status(), "Fetched page");
        let html = response.text().await?;
        Ok(html_to_text(&html))
    }
}

/// Prefixes `https://` unless the URL already names an http(s) scheme.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    // wiremock's `header` matcher splits values on commas, which the
    // Chrome user agent contains; compare the raw bytes instead.
    fn exact_user_agent(request: &Request) -> bool {
        request
            .headers
            .get("user-agent")
            .is_some_and(|value| value.as_bytes() == BROWSER_USER_AGENT.as_bytes())
    }

    #[test]
    fn test_normalize_url_adds_https() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("  example.com/a?b=1 "), "https://example.com/a?b=1");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("HTTPS://Example.com"), "HTTPS://Example.com");
        assert_eq!(normalize_url("httpbin.org"), "https://httpbin.org");
    }

    #[tokio::test]
    async fn test_scrape_sends_browser_header_and_strips_markup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/article"))
            .and(exact_user_agent)
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "<html><head><script>track()</script><style>p{}</style></head>\
                 <body><h1>Rust 2.0</h1>\n\n<p>Released   today.</p></body></html>",
                "text/html",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let scraper = WebScraper::new().unwrap();
        let text = scraper.scrape(&format!("{}/article", server.uri())).await;
        assert_eq!(text, "Rust 2.0 Released today.");
    }

    #[tokio::test]
    async fn test_scrape_timeout_returns_error_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("too late")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let scraper = WebScraper::with_timeout(Duration::from_millis(100)).unwrap();
        let text = scraper.scrape(&server.uri()).await;
        assert!(text.starts_with("Error scraping website:"), "got: {text}");
    }

    #[tokio::test]
    async fn test_scrape_unreachable_host_returns_error_text() {
        let scraper = WebScraper::with_timeout(Duration::from_secs(2)).unwrap();
        let text = scraper.scrape("http://127.0.0.1:1/nothing").await;
        assert!(text.starts_with("Error scraping website:"), "got: {text}");
    }
}
