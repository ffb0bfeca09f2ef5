//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{
    CompanyRecord, FrontierRecord, FrontierWrite, RunCounters, RunRecord, RunStatus,
    UpsertOutcome,
};
use crate::ScoutError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::path::Path;

const COMPANY_COLUMNS: &str = "id, name, url, created_at, updated_at";

const FRONTIER_COLUMNS: &str =
    "id, company_id, url, domain, depth, is_target, last_visited, created_at, updated_at";

const RUN_COLUMNS: &str = "id, started_at, finished_at, config_hash, status, \
     companies_processed, targets_found, companies_exhausted, companies_failed, targets_rotted";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database file and applies the schema
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn new(path: &Path) -> Result<Self, ScoutError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> Result<Self, ScoutError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    fn count(&self, sql: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn company_from_row(row: &Row<'_>) -> rusqlite::Result<CompanyRecord> {
    Ok(CompanyRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        url: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn frontier_from_row(row: &Row<'_>) -> rusqlite::Result<FrontierRecord> {
    Ok(FrontierRecord {
        id: row.get(0)?,
        company_id: row.get(1)?,
        url: row.get(2)?,
        domain: row.get(3)?,
        depth: row.get(4)?,
        is_target: row.get(5)?,
        last_visited: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
        counters: RunCounters {
            companies_processed: row.get::<_, i64>(5)? as u64,
            targets_found: row.get::<_, i64>(6)? as u64,
            companies_exhausted: row.get::<_, i64>(7)? as u64,
            companies_failed: row.get::<_, i64>(8)? as u64,
            targets_rotted: row.get::<_, i64>(9)? as u64,
        },
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Updates an existing frontier row; depth is never lowered
fn update_frontier_row(
    conn: &Connection,
    entry_id: i64,
    write: &FrontierWrite,
    now: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE frontier_urls
         SET is_target = ?1,
             last_visited = COALESCE(?2, last_visited),
             depth = MAX(depth, ?3),
             domain = ?4,
             updated_at = ?5
         WHERE id = ?6",
        params![
            write.is_target,
            write.visited_at.map(|t| t.to_rfc3339()),
            write.depth,
            write.domain,
            now,
            entry_id
        ],
    )?;
    Ok(())
}

impl Storage for SqliteStorage {
    // ===== Companies =====

    fn upsert_company(&mut self, name: &str, url: &str) -> StorageResult<(i64, bool)> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            "INSERT INTO companies (name, url, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(url) DO NOTHING",
            params![name, url, now],
        )?;

        let id: i64 = self.conn.query_row(
            "SELECT id FROM companies WHERE url = ?1",
            params![url],
            |row| row.get(0),
        )?;

        Ok((id, inserted > 0))
    }

    fn get_company(&self, company_id: i64) -> StorageResult<CompanyRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM companies WHERE id = ?1", COMPANY_COLUMNS),
                params![company_id],
                company_from_row,
            )
            .optional()?
            .ok_or(StorageError::CompanyNotFound(company_id))
    }

    fn list_companies(&self) -> StorageResult<Vec<CompanyRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM companies ORDER BY id",
            COMPANY_COLUMNS
        ))?;
        let companies = stmt
            .query_map([], company_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(companies)
    }

    fn companies_without_target(&self) -> StorageResult<Vec<CompanyRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM companies c
             WHERE NOT EXISTS (
                 SELECT 1 FROM frontier_urls f
                 WHERE f.company_id = c.id AND f.is_target = 1
             )
             ORDER BY c.id",
            COMPANY_COLUMNS
        ))?;
        let companies = stmt
            .query_map([], company_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(companies)
    }

    // ===== Frontier =====

    fn record_frontier(&mut self, write: &FrontierWrite) -> StorageResult<UpsertOutcome> {
        let now = Utc::now().to_rfc3339();

        // Savepoint nests inside an open company transaction; dropping it
        // without commit rolls the partial write back.
        let sp = self.conn.savepoint()?;

        let existing: Option<i64> = sp
            .query_row(
                "SELECT id FROM frontier_urls WHERE company_id = ?1 AND url = ?2",
                params![write.company_id, write.url],
                |row| row.get(0),
            )
            .optional()?;

        let outcome = match existing {
            Some(id) => {
                update_frontier_row(&sp, id, write, &now)?;
                UpsertOutcome::Updated(id)
            }
            None => {
                let inserted = sp.execute(
                    "INSERT INTO frontier_urls
                     (company_id, url, domain, depth, is_target, last_visited, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                    params![
                        write.company_id,
                        write.url,
                        write.domain,
                        write.depth,
                        write.is_target,
                        write.visited_at.map(|t| t.to_rfc3339()),
                        now
                    ],
                );

                match inserted {
                    Ok(_) => UpsertOutcome::Inserted(sp.last_insert_rowid()),
                    Err(e) if is_unique_violation(&e) => {
                        tracing::debug!(url = %write.url, "Frontier insert raced, updating instead");
                        let id: i64 = sp.query_row(
                            "SELECT id FROM frontier_urls WHERE company_id = ?1 AND url = ?2",
                            params![write.company_id, write.url],
                            |row| row.get(0),
                        )?;
                        update_frontier_row(&sp, id, write, &now)?;
                        UpsertOutcome::Updated(id)
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        sp.commit()?;
        Ok(outcome)
    }

    fn get_frontier_entry(
        &self,
        company_id: i64,
        url: &str,
    ) -> StorageResult<Option<FrontierRecord>> {
        let entry = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM frontier_urls WHERE company_id = ?1 AND url = ?2",
                    FRONTIER_COLUMNS
                ),
                params![company_id, url],
                frontier_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    fn list_frontier(&self, company_id: i64) -> StorageResult<Vec<FrontierRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM frontier_urls WHERE company_id = ?1 ORDER BY id",
            FRONTIER_COLUMNS
        ))?;
        let entries = stmt
            .query_map(params![company_id], frontier_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn target_entries(&self) -> StorageResult<Vec<FrontierRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM frontier_urls WHERE is_target = 1 ORDER BY company_id, id",
            FRONTIER_COLUMNS
        ))?;
        let entries = stmt
            .query_map([], frontier_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn delete_frontier_entry(&mut self, entry_id: i64) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM frontier_urls WHERE id = ?1", params![entry_id])?;
        Ok(())
    }

    // ===== Company Transactions =====

    fn begin_company(&mut self) -> StorageResult<()> {
        if !self.conn.is_autocommit() {
            return Err(StorageError::Transaction(
                "a company transaction is already open".to_string(),
            ));
        }
        self.conn.execute_batch("BEGIN")?;
        Ok(())
    }

    fn commit_company(&mut self) -> StorageResult<()> {
        if self.conn.is_autocommit() {
            return Err(StorageError::Transaction(
                "no company transaction to commit".to_string(),
            ));
        }
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn rollback_company(&mut self) -> StorageResult<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK")?;
        }
        Ok(())
    }

    // ===== Runs =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        counters: &RunCounters,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs
             SET status = ?1, finished_at = ?2,
                 companies_processed = ?3, targets_found = ?4,
                 companies_exhausted = ?5, companies_failed = ?6, targets_rotted = ?7
             WHERE id = ?8",
            params![
                status.to_db_string(),
                now,
                counters.companies_processed as i64,
                counters.targets_found as i64,
                counters.companies_exhausted as i64,
                counters.companies_failed as i64,
                counters.targets_rotted as i64,
                run_id
            ],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                &format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS),
                [],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    // ===== Statistics =====

    fn count_companies(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM companies")
    }

    fn count_frontier(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM frontier_urls")
    }

    fn count_companies_with_target(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(DISTINCT company_id) FROM frontier_urls WHERE is_target = 1")
    }

    fn depth_breakdown(&self) -> StorageResult<BTreeMap<u32, u64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT depth, COUNT(*) FROM frontier_urls GROUP BY depth ORDER BY depth")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, u32>(0)?, row.get::<_, i64>(1)? as u64))
        })?;

        let mut breakdown = BTreeMap::new();
        for row in rows {
            let (depth, count) = row?;
            breakdown.insert(depth, count);
        }
        Ok(breakdown)
    }
}
