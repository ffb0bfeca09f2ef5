//! Database schema definitions
//!
//! All tables are created idempotently when a database is opened.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Seed companies; one row per canonical root URL
CREATE TABLE IF NOT EXISTS companies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    url TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Every URL examined for a company
CREATE TABLE IF NOT EXISTS frontier_urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    company_id INTEGER NOT NULL REFERENCES companies(id),
    url TEXT NOT NULL,
    domain TEXT NOT NULL,
    depth INTEGER NOT NULL DEFAULT 0,
    is_target INTEGER,
    last_visited TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(company_id, url)
);

CREATE INDEX IF NOT EXISTS idx_frontier_company ON frontier_urls(company_id);
CREATE INDEX IF NOT EXISTS idx_frontier_target ON frontier_urls(is_target);

-- Job postings written by the downstream extraction stage
CREATE TABLE IF NOT EXISTS job_posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    role TEXT NOT NULL,
    url TEXT NOT NULL UNIQUE,
    url_domain TEXT NOT NULL,
    url_target TEXT NOT NULL,
    company_id INTEGER NOT NULL REFERENCES companies(id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_job_posts_company ON job_posts(company_id);

-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    companies_processed INTEGER NOT NULL DEFAULT 0,
    targets_found INTEGER NOT NULL DEFAULT 0,
    companies_exhausted INTEGER NOT NULL DEFAULT 0,
    companies_failed INTEGER NOT NULL DEFAULT 0,
    targets_rotted INTEGER NOT NULL DEFAULT 0
);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}
