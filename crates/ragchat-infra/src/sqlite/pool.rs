//! Database pool with split reader/writer connections in WAL mode.
//!
//! SQLite allows only one writer at a time, so chat upserts go through a
//! single-connection writer pool while lookups use a small reader pool.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// Split read/write pool for SQLite with WAL mode.
///
/// - `reader`: up to 8 connections for concurrent `get_chat` lookups.
/// - `writer`: one connection for serialized `save_chat` upserts.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open both pools and run migrations on the writer.
    ///
    /// Both pools use WAL journal mode, foreign key enforcement, and a
    /// 5-second busy timeout. The database file is created if missing.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let base_opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        ensure_parent_dir(base_opts.get_filename()).await?;

        let read_opts = base_opts.clone().read_only(true);
        let write_opts = base_opts;

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(write_opts)
            .await?;

        // The reader opens read-only, so the schema must exist first.
        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(read_opts)
            .await?;

        tracing::debug!(url = %database_url, "SQLite pools ready");
        Ok(Self { reader, writer })
    }
}

/// Create the directory holding the database file, if any.
async fn ensure_parent_dir(filename: &Path) -> Result<(), sqlx::Error> {
    match filename.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            tokio::fs::create_dir_all(parent).await.map_err(sqlx::Error::Io)
        }
        _ => Ok(()),
    }
}
