//! SQL DDL for the hiring schema.
//! SQLite-first design; constraints live in the DDL so the store rejects bad writes.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::HirelinkError;

pub const TITLE_MAX_LEN: usize = 256;

/// Tables in creation order (parents first).
pub const TABLES: [&str; 4] = ["workers", "resumes", "vacancies", "vacancies_replies"];

/// SQLite schema includes:
/// - `workers` (people looking for work)
/// - `resumes` (one worker owns many, removed with the worker)
/// - `vacancies` (open positions)
/// - `vacancies_replies` (resume x vacancy association, one row per pair)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Workers
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS workers (
    id INTEGER PRIMARY KEY NOT NULL,
    username TEXT NOT NULL,
    phone TEXT NULL
);

-- ---------------------------------------------------------------------------
-- Resumes (owned by a worker)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS resumes (
    id INTEGER PRIMARY KEY NOT NULL,
    title TEXT NOT NULL CHECK (length(title) <= 256),
    compensation INTEGER NULL CHECK (compensation IS NULL OR compensation > 0),
    workload TEXT NOT NULL CHECK (workload IN ('parttime', 'fulltime')),
    worker_id INTEGER NOT NULL REFERENCES workers(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_resumes_worker_id ON resumes(worker_id);

-- ---------------------------------------------------------------------------
-- Vacancies
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS vacancies (
    id INTEGER PRIMARY KEY NOT NULL,
    title TEXT NOT NULL CHECK (length(title) <= 256),
    compensation INTEGER NULL CHECK (compensation IS NULL OR compensation > 0)
);

-- ---------------------------------------------------------------------------
-- Applications (resume x vacancy)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS vacancies_replies (
    resume_id INTEGER NOT NULL REFERENCES resumes(id) ON DELETE CASCADE,
    vacancy_id INTEGER NOT NULL REFERENCES vacancies(id) ON DELETE CASCADE,
    cover_letter TEXT NULL,
    PRIMARY KEY (resume_id, vacancy_id)
);

CREATE INDEX IF NOT EXISTS idx_vacancies_replies_vacancy_id ON vacancies_replies(vacancy_id);
"#;

/// Creates any missing tables. Safe to run repeatedly.
pub async fn apply_schema(pool: &SqlitePool) -> Result<(), HirelinkError> {
    let mut tx = pool.begin().await?;
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Drops every declared table and recreates the schema.
///
/// Destructive: all stored rows are lost. Meant for demo resets only.
pub async fn bootstrap(pool: &SqlitePool) -> Result<(), HirelinkError> {
    let mut tx = pool.begin().await?;
    for table in TABLES.iter().rev() {
        sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    apply_schema(pool).await?;
    info!(tables = TABLES.len(), "schema recreated");
    Ok(())
}
