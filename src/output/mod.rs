//! Output module for statistics and the target-page hand-off
//!
//! This module handles:
//! - Loading and printing store statistics (`--stats`)
//! - Building the per-company target summary from storage
//! - Rendering that summary as markdown (`--export-summary`)

mod markdown;
pub mod stats;
mod summary;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{load_statistics, print_statistics, ScoutStatistics};
pub use summary::{CompanyTargets, OutputError, OutputResult, ScoutSummary, TargetPage};

use crate::storage::Storage;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Generates a summary from storage
///
/// Works on an empty store too: a database without runs still lists its
/// seeded companies.
pub fn generate_summary(storage: &dyn Storage) -> OutputResult<ScoutSummary> {
    let stats = stats::load_statistics(storage)?;

    let duration_seconds = stats.latest_run.as_ref().and_then(|run| {
        let started = run.started_at.parse::<DateTime<Utc>>().ok()?;
        let finished = run.finished_at.as_ref()?.parse::<DateTime<Utc>>().ok()?;
        u64::try_from((finished - started).num_seconds()).ok()
    });

    let mut targets_by_company: HashMap<i64, Vec<TargetPage>> = HashMap::new();
    for entry in storage.target_entries()? {
        targets_by_company
            .entry(entry.company_id)
            .or_default()
            .push(TargetPage {
                url: entry.url,
                depth: entry.depth,
                last_visited: entry.last_visited,
            });
    }

    let companies = storage
        .list_companies()?
        .into_iter()
        .map(|company| CompanyTargets {
            targets: targets_by_company.remove(&company.id).unwrap_or_default(),
            company_id: company.id,
            name: company.name,
            url: company.url,
        })
        .collect();

    Ok(ScoutSummary {
        latest_run: stats.latest_run,
        duration_seconds,
        total_companies: stats.total_companies,
        companies_with_target: stats.companies_with_target,
        total_frontier: stats.total_frontier,
        depth_breakdown: stats.depth_breakdown,
        companies,
    })
}
