//! Career page locator
//!
//! Finds one plausible careers page for a company root. Strategies run in a
//! fixed order and the first candidate that answers exactly `200` wins:
//!
//! 1. Direct probing of well-known path suffixes
//! 2. Scanning the root page's links (URL fragments, then link text)
//! 3. Scanning `/sitemap.xml`
//!
//! Network failures, timeouts and non-200 answers never abort the search;
//! a company without a careers page simply yields `None`.

use crate::config::{CrawlerConfig, LocatorConfig};
use crate::crawler::fetcher::{FetchResult, FetchedPage, Fetcher, WaitStrategy};
use crate::crawler::parser::PageLink;
use crate::url::{origin_of, resolve_against};
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

/// Which strategy produced a career page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateStrategy {
    DirectProbe,
    LinkUrl,
    LinkText,
    Sitemap,
}

impl LocateStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectProbe => "direct_probe",
            Self::LinkUrl => "link_url",
            Self::LinkText => "link_text",
            Self::Sitemap => "sitemap",
        }
    }
}

impl fmt::Display for LocateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A verified careers page
#[derive(Debug, Clone)]
pub struct LocatedCareerPage {
    /// The candidate URL as probed (before redirects)
    pub url: Url,

    pub strategy: LocateStrategy,

    /// The page served for `url`
    pub page: FetchedPage,
}

/// Multi-strategy careers page search
pub struct CareerLocator<'a> {
    fetcher: &'a dyn Fetcher,
    tables: &'a LocatorConfig,
    probe_timeout: Duration,
    page_timeout: Duration,
    sitemap_enabled: bool,
    sitemap_verify_limit: usize,
}

/// Candidate URLs already probed during one `locate` call
type Tried = HashSet<String>;

impl<'a> CareerLocator<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, tables: &'a LocatorConfig, crawler: &CrawlerConfig) -> Self {
        Self {
            fetcher,
            tables,
            probe_timeout: Duration::from_millis(crawler.probe_timeout_ms),
            page_timeout: Duration::from_millis(crawler.page_timeout_ms),
            sitemap_enabled: crawler.sitemap_enabled,
            sitemap_verify_limit: crawler.sitemap_verify_limit,
        }
    }

    /// Runs the strategy cascade for `root`
    pub async fn locate(&self, root: &Url) -> Option<LocatedCareerPage> {
        let origin = origin_of(root);
        let mut tried = Tried::new();

        if let Some(found) = self.probe_direct_paths(&origin, &mut tried).await {
            return Some(found);
        }
        tracing::debug!(root = %root, "Direct probing found nothing, scanning links");

        if let Some(found) = self.scan_root_links(root, &mut tried).await {
            return Some(found);
        }

        if self.sitemap_enabled {
            tracing::debug!(root = %root, "Link scan found nothing, checking sitemap");
            if let Some(found) = self.scan_sitemap(&origin, &mut tried).await {
                return Some(found);
            }
        }

        tracing::info!(root = %root, "No career page found");
        None
    }

    /// Fetches `candidate` once; verified iff the answer is exactly 200
    async fn verify(
        &self,
        candidate: &Url,
        strategy: LocateStrategy,
        tried: &mut Tried,
    ) -> Option<LocatedCareerPage> {
        if !tried.insert(candidate.to_string()) {
            return None;
        }

        tracing::debug!(url = %candidate, strategy = %strategy, "Probing candidate");
        match self
            .fetcher
            .fetch(candidate, WaitStrategy::DomContentLoaded, self.probe_timeout)
            .await
        {
            FetchResult::Success(page) if page.status_code == 200 => {
                tracing::info!(url = %candidate, strategy = %strategy, "Career page found");
                Some(LocatedCareerPage {
                    url: candidate.clone(),
                    strategy,
                    page,
                })
            }
            other => {
                tracing::debug!(url = %candidate, status = ?other.status_code(), "Candidate rejected");
                None
            }
        }
    }

    async fn probe_direct_paths(&self, origin: &Url, tried: &mut Tried) -> Option<LocatedCareerPage> {
        for path in &self.tables.career_paths {
            let Ok(candidate) = origin.join(path) else {
                continue;
            };
            if let Some(found) = self.verify(&candidate, LocateStrategy::DirectProbe, tried).await {
                return Some(found);
            }
        }
        None
    }

    async fn scan_root_links(&self, root: &Url, tried: &mut Tried) -> Option<LocatedCareerPage> {
        let page = match self
            .fetcher
            .fetch(root, WaitStrategy::NetworkIdle, self.page_timeout)
            .await
        {
            FetchResult::Success(page) => page,
            other => {
                tracing::debug!(root = %root, status = ?other.status_code(), "Root page unavailable");
                return None;
            }
        };
        tracing::debug!(root = %root, links = page.links.len(), "Scanning root page links");

        for link in url_fragment_matches(&page.links, &self.tables.url_fragments) {
            if let Some(found) = self.verify(link, LocateStrategy::LinkUrl, tried).await {
                return Some(found);
            }
        }

        for link in keyword_matches(&page.links, &self.tables.keywords) {
            if let Some(found) = self.verify(link, LocateStrategy::LinkText, tried).await {
                return Some(found);
            }
        }

        None
    }

    async fn scan_sitemap(&self, origin: &Url, tried: &mut Tried) -> Option<LocatedCareerPage> {
        let sitemap_url = origin.join("/sitemap.xml").ok()?;
        let page = match self
            .fetcher
            .fetch(&sitemap_url, WaitStrategy::DomContentLoaded, self.page_timeout)
            .await
        {
            FetchResult::Success(page) => page,
            _ => return None,
        };

        let candidates = sitemap_matches(&page.body, &self.tables.sitemap_keywords);
        for loc in candidates.iter().take(self.sitemap_verify_limit) {
            let Some(candidate) = resolve_against(origin, loc) else {
                continue;
            };
            if let Some(found) = self.verify(&candidate, LocateStrategy::Sitemap, tried).await {
                return Some(found);
            }
        }
        None
    }
}

/// Links whose lowercased href contains a career fragment, in document order
pub fn url_fragment_matches<'l>(links: &'l [PageLink], fragments: &[String]) -> Vec<&'l Url> {
    links
        .iter()
        .filter_map(|link| {
            let url = link.url.as_ref()?;
            let href = link.href.to_lowercase();
            fragments
                .iter()
                .any(|fragment| href.contains(&fragment.to_lowercase()))
                .then_some(url)
        })
        .collect()
}

/// Links whose text, aria-label or title matches a keyword
///
/// Exact (case-insensitive) matches across all links come first, then
/// substring matches; each group keeps document order.
pub fn keyword_matches<'l>(links: &'l [PageLink], keywords: &[String]) -> Vec<&'l Url> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    let labels = |link: &PageLink| -> Vec<String> {
        [Some(&link.text), link.aria_label.as_ref(), link.title.as_ref()]
            .into_iter()
            .flatten()
            .map(|label| label.to_lowercase())
            .filter(|label| !label.is_empty())
            .collect()
    };

    let navigable: Vec<(&Url, Vec<String>)> = links
        .iter()
        .filter_map(|link| Some((link.url.as_ref()?, labels(link))))
        .collect();

    let exact = navigable.iter().filter(|(_, labels)| {
        labels
            .iter()
            .any(|label| keywords.iter().any(|k| label == k))
    });
    let partial = navigable.iter().filter(|(_, labels)| {
        labels
            .iter()
            .any(|label| keywords.iter().any(|k| label.contains(k.as_str())))
    });

    exact.chain(partial).map(|(url, _)| *url).collect()
}

/// Compiled once per process
fn sitemap_loc() -> &'static Regex {
    static LOC: OnceLock<Regex> = OnceLock::new();
    LOC.get_or_init(|| {
        Regex::new(r"<loc>\s*([^<]+?)\s*</loc>").expect("static <loc> pattern is valid")
    })
}

/// `<loc>` entries containing a career keyword, in sitemap order
pub fn sitemap_matches(body: &str, keywords: &[String]) -> Vec<String> {
    sitemap_loc()
        .captures_iter(body)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .filter(|entry| {
            let lower = entry.to_lowercase();
            keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
        })
        .collect()
}
