//! Career-Scout: a career page locator and classifier
//!
//! This crate finds the careers page of each known company, decides whether that
//! page actually lists job postings, and follows classifier suggestions until it
//! does. Every visited URL is recorded in a per-company frontier so repeated runs
//! only revisit companies that still lack a live target page.

pub mod classifier;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Career-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Classifier error: {0}")]
    Classifier(#[from] classifier::ClassifierError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CompanyPhase,
        to: state::CompanyPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Missing required configuration: {0}")]
    Missing(String),
}

/// Errors normalizing company root URLs
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Cannot parse company URL: {0}")]
    Parse(String),

    #[error("Unsupported URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Company URL has no host")]
    MissingDomain,

    #[error("Cannot normalize company URL: {0}")]
    Malformed(String),
}

/// Result type alias for Career-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use classifier::{Classification, Classifier, Suggestion};
pub use config::Config;
pub use crawler::{CareerLocator, Coordinator, Explorer, Fetcher};
pub use state::CompanyPhase;
pub use url::{extract_domain, normalize_company_url, resolve_against};
