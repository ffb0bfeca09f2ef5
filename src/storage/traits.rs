//! Storage traits and error types

use crate::storage::{
    CompanyRecord, FrontierRecord, FrontierWrite, RunCounters, RunRecord, RunStatus,
    UpsertOutcome,
};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Company not found: {0}")]
    CompanyNotFound(i64),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Transaction state error: {0}")]
    Transaction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Everything the locator, explorer and coordinator persist goes through this
/// interface. Writes for one company are grouped with `begin_company` /
/// `commit_company` so a failure loses at most that company's progress.
pub trait Storage {
    // ===== Companies =====

    /// Inserts a company unless its URL is already known
    ///
    /// Returns the company ID and whether a row was created.
    fn upsert_company(&mut self, name: &str, url: &str) -> StorageResult<(i64, bool)>;

    fn get_company(&self, company_id: i64) -> StorageResult<CompanyRecord>;

    fn list_companies(&self) -> StorageResult<Vec<CompanyRecord>>;

    /// Companies with no frontier entry where `is_target` is true
    ///
    /// This is the crawl work queue.
    fn companies_without_target(&self) -> StorageResult<Vec<CompanyRecord>>;

    // ===== Frontier =====

    /// Upserts a frontier entry by its (company, url) natural key
    ///
    /// An existing entry gets `is_target` and `last_visited` replaced; its
    /// depth only ever grows. A missing entry is inserted with the given depth.
    fn record_frontier(&mut self, write: &FrontierWrite) -> StorageResult<UpsertOutcome>;

    fn get_frontier_entry(&self, company_id: i64, url: &str)
        -> StorageResult<Option<FrontierRecord>>;

    /// All entries of one company, in insertion order
    fn list_frontier(&self, company_id: i64) -> StorageResult<Vec<FrontierRecord>>;

    /// All entries flagged as targets (the hand-off to job extraction)
    fn target_entries(&self) -> StorageResult<Vec<FrontierRecord>>;

    fn delete_frontier_entry(&mut self, entry_id: i64) -> StorageResult<()>;

    // ===== Company Transactions =====

    fn begin_company(&mut self) -> StorageResult<()>;

    fn commit_company(&mut self) -> StorageResult<()>;

    /// Rolls back the open company transaction, if any
    fn rollback_company(&mut self) -> StorageResult<()>;

    // ===== Runs =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        counters: &RunCounters,
    ) -> StorageResult<()>;

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    // ===== Statistics =====

    fn count_companies(&self) -> StorageResult<u64>;

    fn count_frontier(&self) -> StorageResult<u64>;

    /// Number of distinct companies holding at least one target entry
    fn count_companies_with_target(&self) -> StorageResult<u64>;

    /// Frontier entries per depth
    fn depth_breakdown(&self) -> StorageResult<BTreeMap<u32, u64>>;
}
