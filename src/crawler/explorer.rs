//! Recursive explorer over classifier suggestions
//!
//! Starting from a non-target page, each suggestion is resolved, fetched,
//! classified and written to the frontier. The first target found stops the
//! whole exploration; otherwise suggestions of suggestions are followed until
//! `max_depth`.

use crate::classifier::{Classifier, Suggestion};
use crate::crawler::fetcher::{FetchResult, Fetcher, WaitStrategy};
use crate::storage::{FrontierWrite, Storage, StorageResult};
use crate::url::{extract_domain, frontier_key, resolve_against};
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use url::Url;

type ExploreFuture<'e> = Pin<Box<dyn Future<Output = StorageResult<bool>> + 'e>>;

/// Bounded-depth explorer
///
/// Holds the per-run visited set: a (company, url) pair is fetched at most
/// once per run, whichever page suggested it.
pub struct Explorer<'a> {
    fetcher: &'a dyn Fetcher,
    classifier: &'a dyn Classifier,
    page_timeout: Duration,
    visited: HashSet<(i64, String)>,
}

impl<'a> Explorer<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, classifier: &'a dyn Classifier, page_timeout: Duration) -> Self {
        Self {
            fetcher,
            classifier,
            page_timeout,
            visited: HashSet::new(),
        }
    }

    /// Records `url` as visited for `company_id`; returns false if it already was
    pub fn mark_visited(&mut self, company_id: i64, url: &Url) -> bool {
        self.visited.insert((company_id, frontier_key(url)))
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Explores `suggestions` made by the page at `base_url`
    ///
    /// Entries are written at `depth`; recursion continues at `depth + 1`
    /// while `depth < max_depth`. Returns true as soon as any page at any
    /// level is classified as a target. Fetch failures skip the suggestion;
    /// only storage errors are returned.
    pub fn explore<'e>(
        &'e mut self,
        storage: &'e mut dyn Storage,
        base_url: &'e Url,
        suggestions: &'e [Suggestion],
        company_id: i64,
        depth: u32,
        max_depth: u32,
    ) -> ExploreFuture<'e> {
        Box::pin(async move {
            if depth == 0 || depth > max_depth {
                return Ok(false);
            }

            for suggestion in suggestions {
                let raw = suggestion.url.trim();
                if raw.is_empty() {
                    continue;
                }

                let Some(url) = resolve_against(base_url, raw) else {
                    tracing::debug!(suggestion = %raw, "Suggestion is not a fetchable URL");
                    continue;
                };

                if !self.mark_visited(company_id, &url) {
                    tracing::debug!(url = %url, "Already visited this run");
                    continue;
                }

                tracing::info!(url = %url, depth, "Exploring suggested URL");
                let page = match self
                    .fetcher
                    .fetch(&url, WaitStrategy::NetworkIdle, self.page_timeout)
                    .await
                {
                    FetchResult::Success(page) => page,
                    FetchResult::HttpError { status_code } => {
                        tracing::warn!(url = %url, status = status_code, "Suggested URL failed");
                        continue;
                    }
                    FetchResult::NetworkError { error } => {
                        tracing::warn!(url = %url, error = %error, "Suggested URL unreachable");
                        continue;
                    }
                };

                let classification = self.classifier.classify(&page).await;
                storage.record_frontier(&FrontierWrite::visited(
                    company_id,
                    frontier_key(&url),
                    extract_domain(&url).unwrap_or_default(),
                    depth,
                    classification.is_target,
                ))?;

                if classification.is_target {
                    tracing::info!(url = %url, depth, "Target page found");
                    return Ok(true);
                }

                if depth < max_depth && !classification.suggestions.is_empty() {
                    let found = self
                        .explore(
                            &mut *storage,
                            &url,
                            &classification.suggestions,
                            company_id,
                            depth + 1,
                            max_depth,
                        )
                        .await?;
                    if found {
                        return Ok(true);
                    }
                }
            }

            Ok(false)
        })
    }
}
