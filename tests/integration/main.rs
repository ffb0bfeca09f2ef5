//! Integration tests for Career-Scout
//!
//! Every test drives real HTTP against wiremock servers: one playing the
//! company website, one playing the classifier endpoint.

mod common;
mod crawl_tests;
mod export_tests;
