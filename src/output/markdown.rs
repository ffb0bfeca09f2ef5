//! Markdown summary generation
//!
//! This module renders the hand-off view: one section per company listing
//! the pages classified as job listings, preceded by run and frontier
//! statistics.

use crate::output::summary::{OutputResult, ScoutSummary};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary to `output_path`, creating parent directories
///
/// # Arguments
///
/// * `summary` - The summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &ScoutSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a summary as markdown
pub fn format_markdown_summary(summary: &ScoutSummary) -> String {
    let mut md = String::new();

    md.push_str("# Career-Scout Summary\n\n");

    if let Some(run) = &summary.latest_run {
        md.push_str("## Latest Run\n\n");
        md.push_str(&format!("- **Run ID**: {}\n", run.id));
        md.push_str(&format!("- **Started**: {}\n", run.started_at));
        if let Some(finished) = &run.finished_at {
            md.push_str(&format!("- **Finished**: {}\n", finished));
        }
        if let Some(duration) = summary.duration_seconds {
            md.push_str(&format!(
                "- **Duration**: {} seconds ({:.2} minutes)\n",
                duration,
                duration as f64 / 60.0
            ));
        }
        md.push_str(&format!("- **Status**: {}\n", run.status.to_db_string()));
        md.push_str(&format!("- **Config Hash**: {}\n", run.config_hash));
        md.push_str(&format!(
            "- **Processed / Found / Exhausted / Failed / Rotted**: {} / {} / {} / {} / {}\n\n",
            run.counters.companies_processed,
            run.counters.targets_found,
            run.counters.companies_exhausted,
            run.counters.companies_failed,
            run.counters.targets_rotted
        ));
    }

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Companies**: {}\n", summary.total_companies));
    md.push_str(&format!(
        "- **With Target Page**: {}\n",
        summary.companies_with_target
    ));
    md.push_str(&format!("- **Target Pages**: {}\n", summary.total_targets()));
    md.push_str(&format!(
        "- **Frontier Entries**: {}\n",
        summary.total_frontier
    ));
    md.push_str(&format!(
        "- **Coverage**: {:.2}%\n\n",
        summary.coverage_rate()
    ));

    if !summary.depth_breakdown.is_empty() {
        md.push_str("## Depth Breakdown\n\n");
        md.push_str("| Depth | Entries |\n");
        md.push_str("|-------|---------|\n");
        for (depth, count) in &summary.depth_breakdown {
            md.push_str(&format!("| {} | {} |\n", depth, count));
        }
        md.push('\n');
    }

    md.push_str("## Target Pages\n\n");
    let mut any = false;
    for company in summary.companies.iter().filter(|c| !c.targets.is_empty()) {
        any = true;
        md.push_str(&format!("### {}\n\n", company.name));
        md.push_str(&format!("Site: {}\n\n", company.url));
        md.push_str("| URL | Depth | Last Visited |\n");
        md.push_str("|-----|-------|--------------|\n");
        for target in &company.targets {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                target.url,
                target.depth,
                target.last_visited.as_deref().unwrap_or("-")
            ));
        }
        md.push('\n');
    }
    if !any {
        md.push_str("No target pages found yet.\n\n");
    }

    let missing: Vec<_> = summary.missing().collect();
    if !missing.is_empty() {
        md.push_str("## Companies Without a Target\n\n");
        for company in missing {
            md.push_str(&format!("- {} ({})\n", company.name, company.url));
        }
        md.push('\n');
    }

    md
}
