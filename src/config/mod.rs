//! Configuration module for Career-Scout
//!
//! Loads the TOML file that names the seed companies, the classifier endpoint,
//! crawl limits and the locator keyword tables.
//!
//! # Example
//!
//! ```no_run
//! use career_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Explorer will stop at depth {}", config.crawler.max_depth);
//! ```

mod parser;
pub mod tables;
mod types;
mod validation;

pub use types::{
    ClassifierSettings, CompanyEntry, Config, CrawlerConfig, LocatorConfig, OutputConfig,
    UserAgentConfig,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
