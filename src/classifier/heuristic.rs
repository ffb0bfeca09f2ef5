//! Keyword-count fallback used when the remote classifier is unavailable

use crate::classifier::Classification;
use crate::config::tables::JOB_KEYWORDS;

/// Minimum distinct job keywords for a page to count as a listing
pub const MIN_KEYWORD_MATCHES: usize = 2;

/// Counts distinct job keywords present in `text` (case-insensitive)
pub fn keyword_matches(text: &str) -> usize {
    let lower = text.to_lowercase();
    JOB_KEYWORDS
        .iter()
        .filter(|keyword| lower.contains(*keyword))
        .count()
}

/// Best-effort verdict from page text alone; never suggests URLs
pub fn fallback_classification(text: &str) -> Classification {
    let matches = keyword_matches(text);
    tracing::info!(keyword_matches = matches, "Using fallback classification");
    Classification {
        is_target: matches >= MIN_KEYWORD_MATCHES,
        suggestions: Vec::new(),
    }
}
