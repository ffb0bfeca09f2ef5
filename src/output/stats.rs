//! Statistics generation from the scout database
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the storage layer.

use crate::output::summary::OutputResult;
use crate::storage::{RunRecord, Storage};
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct ScoutStatistics {
    /// Total number of seeded companies
    pub total_companies: u64,

    /// Companies with at least one target page
    pub companies_with_target: u64,

    /// Total number of frontier entries across all companies
    pub total_frontier: u64,

    /// Frontier entries per depth
    pub depth_breakdown: BTreeMap<u32, u64>,

    /// Most recent run, if any
    pub latest_run: Option<RunRecord>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(ScoutStatistics)` - Successfully loaded statistics
/// * `Err(OutputError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> OutputResult<ScoutStatistics> {
    Ok(ScoutStatistics {
        total_companies: storage.count_companies()?,
        companies_with_target: storage.count_companies_with_target()?,
        total_frontier: storage.count_frontier()?,
        depth_breakdown: storage.depth_breakdown()?,
        latest_run: storage.get_latest_run()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &ScoutStatistics) {
    println!("=== Career-Scout Statistics ===\n");

    println!("Overview:");
    println!("  Companies: {}", stats.total_companies);
    println!("  Companies with a target page: {}", stats.companies_with_target);
    println!(
        "  Companies still missing one: {}",
        stats.total_companies.saturating_sub(stats.companies_with_target)
    );
    println!("  Frontier entries: {}", stats.total_frontier);
    println!();

    if !stats.depth_breakdown.is_empty() {
        println!("Frontier by Depth:");
        for (depth, count) in &stats.depth_breakdown {
            let percentage = if stats.total_frontier > 0 {
                (*count as f64 / stats.total_frontier as f64) * 100.0
            } else {
                0.0
            };
            println!("  depth {}: {} ({:.1}%)", depth, count, percentage);
        }
        println!();
    }

    match &stats.latest_run {
        Some(run) => {
            println!("Latest Run (#{}):", run.id);
            println!("  Started: {}", run.started_at);
            if let Some(finished) = &run.finished_at {
                println!("  Finished: {}", finished);
            }
            println!("  Status: {}", run.status.to_db_string());
            println!("  Companies processed: {}", run.counters.companies_processed);
            println!("  Targets found: {}", run.counters.targets_found);
            println!("  Exhausted: {}", run.counters.companies_exhausted);
            println!("  Failed: {}", run.counters.companies_failed);
            println!("  Targets rotted: {}", run.counters.targets_rotted);
        }
        None => println!("No runs recorded yet"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FrontierWrite, RunCounters, RunStatus, SqliteStorage};

    #[test]
    fn test_load_statistics_empty_store() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let stats = load_statistics(&storage).unwrap();

        assert_eq!(stats.total_companies, 0);
        assert_eq!(stats.companies_with_target, 0);
        assert_eq!(stats.total_frontier, 0);
        assert!(stats.depth_breakdown.is_empty());
        assert!(stats.latest_run.is_none());
    }

    #[test]
    fn test_load_statistics_counts() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        let (acme, _) = storage.upsert_company("Acme", "https://acme.example").unwrap();
        storage.upsert_company("Globex", "https://globex.example").unwrap();

        storage
            .record_frontier(&FrontierWrite::visited(
                acme,
                "https://acme.example/careers",
                "acme.example",
                1,
                false,
            ))
            .unwrap();
        storage
            .record_frontier(&FrontierWrite::visited(
                acme,
                "https://acme.example/jobs",
                "acme.example",
                2,
                true,
            ))
            .unwrap();

        let run = storage.create_run("hash").unwrap();
        let counters = RunCounters {
            companies_processed: 2,
            targets_found: 1,
            companies_exhausted: 1,
            ..RunCounters::default()
        };
        storage.finish_run(run, RunStatus::Completed, &counters).unwrap();

        let stats = load_statistics(&storage).unwrap();
        assert_eq!(stats.total_companies, 2);
        assert_eq!(stats.companies_with_target, 1);
        assert_eq!(stats.total_frontier, 2);
        assert_eq!(stats.depth_breakdown.get(&1), Some(&1));
        assert_eq!(stats.depth_breakdown.get(&2), Some(&1));

        let latest = stats.latest_run.unwrap();
        assert_eq!(latest.id, run);
        assert_eq!(latest.status, RunStatus::Completed);
        assert_eq!(latest.counters, counters);
    }
}
