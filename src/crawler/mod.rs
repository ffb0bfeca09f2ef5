//! Crawler module for locating and exploring career pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - HTML parsing into visible text and anchors
//! - The multi-strategy career page locator
//! - The bounded-depth suggestion explorer
//! - Overall crawl coordination

mod coordinator;
mod explorer;
mod fetcher;
mod locator;
mod parser;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{run_crawl, Coordinator, CAREER_PAGE_DEPTH};
pub use explorer::Explorer;
pub use fetcher::{build_http_client, FetchResult, FetchedPage, Fetcher, HttpFetcher, WaitStrategy};
pub use locator::{
    keyword_matches, sitemap_matches, url_fragment_matches, CareerLocator, LocateStrategy,
    LocatedCareerPage,
};
pub use parser::{parse_html, PageLink, ParsedPage};
