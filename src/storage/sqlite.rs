//! SQLite-backed snapshot store.
//!
//! One table with the symbol as primary key. `replace_all` clears and
//! refills the table inside a single transaction, so the swap is atomic
//! from the monitor's perspective and a crash mid-commit leaves the
//! previous snapshot intact.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

use super::SnapshotStore;

const SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS snapshot_symbols (symbol TEXT PRIMARY KEY)";

/// Snapshot store backed by a SQLite database file.
pub struct SqliteSnapshotStore {
    pool: SqlitePool,
}

impl SqliteSnapshotStore {
    /// Open the snapshot database at `path`, creating the file, parent
    /// directory, and schema as needed.
    pub async fn open(path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create snapshot directory {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let store = Self::connect(options)
            .await
            .with_context(|| format!("Failed to open snapshot database at {path}"))?;

        info!(path, "Snapshot database ready");
        Ok(store)
    }

    /// Open a private in-memory database (for tests).
    pub async fn open_in_memory() -> Result<Self> {
        Self::connect(SqliteConnectOptions::new().in_memory(true))
            .await
            .context("Failed to open in-memory snapshot database")
    }

    async fn connect(options: SqliteConnectOptions) -> Result<Self> {
        // One connection: an in-memory database is per-connection, and the
        // single-writer cycle model needs no more for the file backend.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .context("Failed to create snapshot schema")?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    async fn load(&self) -> Result<BTreeSet<String>> {
        let rows = sqlx::query("SELECT symbol FROM snapshot_symbols")
            .fetch_all(&self.pool)
            .await
            .context("Failed to load snapshot symbols")?;

        let mut symbols = BTreeSet::new();
        for row in rows {
            symbols.insert(
                row.try_get::<String, _>("symbol")
                    .context("Malformed snapshot row")?,
            );
        }
        Ok(symbols)
    }

    async fn replace_all(&self, symbols: &BTreeSet<String>) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin snapshot transaction")?;

        sqlx::query("DELETE FROM snapshot_symbols")
            .execute(&mut *tx)
            .await
            .context("Failed to clear snapshot")?;

        for symbol in symbols {
            sqlx::query("INSERT INTO snapshot_symbols (symbol) VALUES (?)")
                .bind(symbol)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to store symbol {symbol}"))?;
        }

        tx.commit().await.context("Failed to commit snapshot")?;

        debug!(count = symbols.len(), "Snapshot replaced");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
