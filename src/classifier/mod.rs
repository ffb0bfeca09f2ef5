//! Target page classification
//!
//! A classifier decides whether a fetched page enumerates job postings and,
//! when it does not, suggests links worth exploring next. The production
//! implementation asks a chat-completions model and degrades to a keyword
//! count when the model is unavailable.

mod archive;
mod heuristic;
mod llm;
mod prompt;

pub use archive::FALLBACK_CONFIDENCE;
pub use heuristic::{fallback_classification, keyword_matches, MIN_KEYWORD_MATCHES};
pub use llm::LlmClassifier;
pub use prompt::{format_links, page_excerpt, truncate_text};

use crate::crawler::FetchedPage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the remote half of the classifier
///
/// These never escape `Classifier::classify`; they trigger the fallback.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Classifier endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed classifier response: {0}")]
    MalformedResponse(String),

    #[error("Failed to archive classification: {0}")]
    Archive(std::io::Error),
}

/// A link the classifier thinks is worth visiting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Absolute or relative URL; may be empty
    pub url: String,
    pub text: String,
}

impl Suggestion {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }
}

/// Verdict for one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// The page lists multiple job postings
    pub is_target: bool,

    /// Candidate links, in the order they should be tried
    pub suggestions: Vec<Suggestion>,
}

impl Classification {
    pub fn target() -> Self {
        Self {
            is_target: true,
            suggestions: Vec::new(),
        }
    }

    pub fn not_target(suggestions: Vec<Suggestion>) -> Self {
        Self {
            is_target: false,
            suggestions,
        }
    }
}

/// Decides whether a page is a target
///
/// Implementations never fail; a best-effort verdict is always returned.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, page: &FetchedPage) -> Classification;
}
