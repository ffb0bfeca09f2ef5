//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests with per-call timeouts and transparent redirects
//! - Error classification into a `FetchResult` that never fails

use crate::config::UserAgentConfig;
use crate::crawler::parser::{parse_html, PageLink};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for one fetch
const MAX_REDIRECTS: usize = 10;

/// How long a fetch waits before considering the page loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Return as soon as the document has arrived
    DomContentLoaded,

    /// Wait for the full body plus the configured settle period
    NetworkIdle,
}

/// A page that loaded with a non-error status
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code of the final response
    pub status_code: u16,

    /// Raw response body
    pub body: String,

    /// Page title (HTML only)
    pub title: Option<String>,

    /// Visible text (HTML) or the raw body (anything else)
    pub text: String,

    /// Anchors in document order, resolved against `final_url`
    pub links: Vec<PageLink>,
}

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// Successfully fetched the page (status below 400)
    Success(FetchedPage),

    /// The server answered with a 4xx or 5xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, redirect loop, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Status code when the server answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Success(page) => Some(page.status_code),
            Self::HttpError { status_code } => Some(*status_code),
            Self::NetworkError { .. } => None,
        }
    }

    pub fn into_page(self) -> Option<FetchedPage> {
        match self {
            Self::Success(page) => Some(page),
            _ => None,
        }
    }
}

/// Fetches pages for the locator, explorer and rot check
///
/// Implementations never fail: every problem is reported through
/// `FetchResult`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url, wait: WaitStrategy, timeout: Duration) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Example
///
/// ```no_run
/// use career_scout::config::UserAgentConfig;
/// use career_scout::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "CareerScout".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed fetcher
pub struct HttpFetcher {
    client: Client,
    settle: Duration,
}

impl HttpFetcher {
    /// Creates a fetcher; `settle` is the extra wait applied to `NetworkIdle` loads
    pub fn new(client: Client, settle: Duration) -> Self {
        Self { client, settle }
    }

    /// Builds the client from the user agent configuration
    pub fn from_config(config: &UserAgentConfig, settle: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?, settle))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, wait: WaitStrategy, timeout: Duration) -> FetchResult {
        let response = match self.client.get(url.clone()).timeout(timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Fetch failed");
                return FetchResult::NetworkError {
                    error: describe_error(&e),
                };
            }
        };

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            tracing::debug!(url = %url, status = status.as_u16(), "Fetch returned error status");
            return FetchResult::HttpError {
                status_code: status.as_u16(),
            };
        }

        let final_url = response.url().clone();
        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(is_markup)
            .unwrap_or(true);

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return FetchResult::NetworkError {
                    error: describe_error(&e),
                }
            }
        };

        if wait == WaitStrategy::NetworkIdle && !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }

        let (title, text, links) = if is_html {
            let parsed = parse_html(&body, &final_url);
            (parsed.title, parsed.text, parsed.links)
        } else {
            (None, body.clone(), Vec::new())
        };

        FetchResult::Success(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            body,
            title,
            text,
            links,
        })
    }
}

/// Anything not declared as XML or JSON is treated as HTML; XHTML is HTML
fn is_markup(content_type: &str) -> bool {
    let value = content_type.to_ascii_lowercase();
    value.contains("html") || (!value.contains("xml") && !value.contains("json"))
}

fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("timeout: {}", error)
    } else if error.is_redirect() {
        format!("redirect error: {}", error)
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}
