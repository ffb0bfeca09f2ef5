//! Classification archive: one JSON file per verdict

use crate::classifier::ClassifierError;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use url::Url;

/// Confidence recorded for heuristic verdicts
pub const FALLBACK_CONFIDENCE: u8 = 30;

#[derive(Debug, Serialize)]
struct ArchivedVerdict<'a> {
    page_url: &'a str,
    analysis_timestamp: String,
    result: &'a Value,
}

/// File name stem for a page: `{timestamp}_{host with dots replaced}`
fn file_name(page_url: &str, timestamp: &str) -> String {
    let host = Url::parse(page_url)
        .ok()
        .and_then(|url| url.host_str().map(|h| h.replace('.', "_")))
        .unwrap_or_else(|| "unknown".to_string());
    format!("{}_{}.json", timestamp, host)
}

/// Writes `result` for `page_url` under `dir`, returning the file path
pub fn archive_verdict(dir: &Path, page_url: &str, result: &Value) -> Result<PathBuf, ClassifierError> {
    std::fs::create_dir_all(dir).map_err(ClassifierError::Archive)?;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
    let path = dir.join(file_name(page_url, &timestamp));

    let record = ArchivedVerdict {
        page_url,
        analysis_timestamp: timestamp,
        result,
    };
    let json = serde_json::to_string_pretty(&record)
        .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;
    std::fs::write(&path, json).map_err(ClassifierError::Archive)?;

    Ok(path)
}

/// The archived form of a heuristic verdict
pub fn fallback_record(is_target: bool) -> Value {
    serde_json::json!({
        "is_target": is_target,
        "confidence": FALLBACK_CONFIDENCE,
        "reasoning": "Determined using keyword fallback after classifier failure",
        "suggested_urls": []
    })
}
