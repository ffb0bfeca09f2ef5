//! Scripted collaborators for crawler unit tests

use crate::classifier::{Classification, Classifier};
use crate::crawler::fetcher::{FetchResult, FetchedPage, Fetcher, WaitStrategy};
use crate::crawler::parser::parse_html;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Serves canned statuses/bodies by exact URL and records every request
///
/// Unknown URLs answer 404.
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, (u16, String)>,
    unreachable: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn page(mut self, url: &str, status: u16, body: &str) -> Self {
        self.pages.insert(url.to_string(), (status, body.to_string()));
        self
    }

    /// Makes `url` fail with a network error
    pub fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.push(url.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == url).count()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &Url, _wait: WaitStrategy, _timeout: Duration) -> FetchResult {
        self.calls.lock().unwrap().push(url.to_string());

        if self.unreachable.iter().any(|u| u == url.as_str()) {
            return FetchResult::NetworkError {
                error: "connection refused".to_string(),
            };
        }

        match self.pages.get(url.as_str()) {
            Some((status, body)) if *status < 400 => {
                let parsed = parse_html(body, url);
                FetchResult::Success(FetchedPage {
                    final_url: url.clone(),
                    status_code: *status,
                    body: body.clone(),
                    title: parsed.title,
                    text: parsed.text,
                    links: parsed.links,
                })
            }
            Some((status, _)) => FetchResult::HttpError {
                status_code: *status,
            },
            None => FetchResult::HttpError { status_code: 404 },
        }
    }
}

/// Returns a fixed verdict per page URL and records what it classified
///
/// Unknown pages are classified as non-targets without suggestions.
#[derive(Default)]
pub struct ScriptedClassifier {
    verdicts: HashMap<String, Classification>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedClassifier {
    pub fn verdict(mut self, url: &str, classification: Classification) -> Self {
        self.verdicts.insert(url.to_string(), classification);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn classify(&self, page: &FetchedPage) -> Classification {
        let url = page.final_url.to_string();
        self.calls.lock().unwrap().push(url.clone());
        self.verdicts.get(&url).cloned().unwrap_or_default()
    }
}
