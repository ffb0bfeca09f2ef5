//! Summary types for exported crawl results
//!
//! A summary is a read-only view over the store: the latest run, the
//! frontier shape, and the target pages handed off per company.

use crate::storage::{RunRecord, StorageError};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A frontier entry classified as a job listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPage {
    pub url: String,
    pub depth: u32,
    pub last_visited: Option<String>,
}

/// All target pages known for one company
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyTargets {
    pub company_id: i64,
    pub name: String,
    pub url: String,
    pub targets: Vec<TargetPage>,
}

/// Snapshot of the store used by `--export-summary`
#[derive(Debug, Clone, Default)]
pub struct ScoutSummary {
    /// Most recent run, if any run was ever recorded
    pub latest_run: Option<RunRecord>,
    pub duration_seconds: Option<u64>,

    pub total_companies: u64,
    pub companies_with_target: u64,
    pub total_frontier: u64,

    // depth -> entries
    pub depth_breakdown: BTreeMap<u32, u64>,

    /// Companies in seeding order; those without a target have an empty list
    pub companies: Vec<CompanyTargets>,
}

impl ScoutSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage of companies that have at least one target page
    pub fn coverage_rate(&self) -> f64 {
        if self.total_companies == 0 {
            return 0.0;
        }
        (self.companies_with_target as f64 / self.total_companies as f64) * 100.0
    }

    /// Companies still lacking a target page
    pub fn missing(&self) -> impl Iterator<Item = &CompanyTargets> {
        self.companies.iter().filter(|c| c.targets.is_empty())
    }

    pub fn total_targets(&self) -> usize {
        self.companies.iter().map(|c| c.targets.len()).sum()
    }
}
