use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{ConnectOptions, Sqlite, SqlitePool, Transaction};
use std::{str::FromStr, time::Duration};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::db::schema;
use crate::error::HirelinkError;

/// A unit of work: one pooled connection inside one transaction.
///
/// Changes become visible to other sessions only after [`Transaction::commit`].
/// Dropping a session without committing (including on error or when the
/// enclosing future is cancelled) rolls it back and returns the connection.
pub type Session = Transaction<'static, Sqlite>;

/// Cloneable handle to the connection pool.
///
/// Constructed explicitly from a [`DatabaseConfig`]; there is no process-wide
/// instance.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and makes sure the schema exists.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, HirelinkError> {
        cfg.validate()?;

        let mut connect_opts = SqliteConnectOptions::from_str(cfg.url.as_str())?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
        if !cfg.echo {
            connect_opts = connect_opts.disable_statement_logging();
        }

        let pool = SqlitePoolOptions::new()
            .min_connections(cfg.pool_size.min(cfg.max_connections()))
            .max_connections(cfg.max_connections())
            .acquire_timeout(cfg.acquire_timeout())
            .connect_with(connect_opts)
            .await?;

        schema::apply_schema(&pool).await?;

        info!(
            url = %cfg.url,
            pool_size = cfg.pool_size,
            max_overflow = cfg.max_overflow,
            "database ready"
        );
        Ok(Self { pool })
    }

    /// Opens a new session. The caller commits explicitly.
    pub async fn session(&self) -> Result<Session, HirelinkError> {
        Ok(self.pool.begin().await?)
    }

    /// Drops and recreates every table.
    pub async fn bootstrap(&self) -> Result<(), HirelinkError> {
        schema::bootstrap(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Waits for checked-out connections to return, then closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
