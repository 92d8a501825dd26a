//! SQLite connection pool setup and schema initialization.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::error::Result;

/// Ledger schema. One row per item id; the upsert in `SqliteLedger` keeps
/// it last-write-wins.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS item_records (
    id           TEXT PRIMARY KEY NOT NULL,
    filename     TEXT NOT NULL,
    version      TEXT NOT NULL,
    size_on_disk INTEGER NOT NULL
)
"#;

/// Create a connection pool for the ledger database at `path`.
///
/// The database file is created if missing. WAL journal mode is enabled so
/// concurrent worker upserts do not serialize behind readers.
pub async fn create_pool(path: impl AsRef<Path>) -> Result<Pool<Sqlite>> {
    let path = path.as_ref();
    info!(path = %path.display(), "Opening ledger database");

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await?;

    sqlx::query(SCHEMA).execute(&pool).await?;

    Ok(pool)
}

/// Create an in-memory pool for tests.
///
/// A single connection keeps the in-memory database alive and shared for
/// the pool's lifetime.
pub async fn create_test_pool() -> Result<Pool<Sqlite>> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    sqlx::query(SCHEMA).execute(&pool).await?;

    Ok(pool)
}
