//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Company seeding and the companies-without-target work queue
//! - Frontier upserts keyed by (company, url)
//! - Run tracking

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::ScoutError;

use chrono::{DateTime, Utc};
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(ScoutError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, ScoutError> {
    SqliteStorage::new(path)
}

/// A seed company
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyRecord {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A URL examined for a company
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierRecord {
    pub id: i64,
    pub company_id: i64,
    pub url: String,
    pub domain: String,
    pub depth: u32,
    /// None until the page has been classified
    pub is_target: Option<bool>,
    pub last_visited: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A frontier write: the natural key plus the observed values
#[derive(Debug, Clone)]
pub struct FrontierWrite {
    pub company_id: i64,
    pub url: String,
    pub domain: String,
    pub depth: u32,
    pub is_target: bool,
    pub visited_at: Option<DateTime<Utc>>,
}

impl FrontierWrite {
    /// A write for a page visited just now
    pub fn visited(
        company_id: i64,
        url: impl Into<String>,
        domain: impl Into<String>,
        depth: u32,
        is_target: bool,
    ) -> Self {
        Self {
            company_id,
            url: url.into(),
            domain: domain.into(),
            depth,
            is_target,
            visited_at: Some(Utc::now()),
        }
    }
}

/// Whether a frontier write created a row or changed an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted(i64),
    Updated(i64),
}

impl UpsertOutcome {
    pub fn id(&self) -> i64 {
        match self {
            Self::Inserted(id) | Self::Updated(id) => *id,
        }
    }
}

/// Per-run counters written to the run ledger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunCounters {
    pub companies_processed: u64,
    pub targets_found: u64,
    pub companies_exhausted: u64,
    pub companies_failed: u64,
    pub targets_rotted: u64,
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub counters: RunCounters,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
