//! Snapshot persistence.
//!
//! The snapshot store owns "what was observed as of the previous
//! successful cycle". Replacement is wholesale: the set is loaded at
//! cycle start and overwritten at cycle end, never mutated
//! incrementally, and a reader never observes a partially replaced set.
//!
//! Backends: SQLite for state that survives restarts, and a
//! process-memory store for tests and throwaway runs.

pub mod sqlite;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Mutex;

pub use sqlite::SqliteSnapshotStore;

/// Durable mapping from symbol → presence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the previously committed symbol set. Empty on first-ever run.
    async fn load(&self) -> Result<BTreeSet<String>>;

    /// Replace the persisted set wholesale with `symbols`.
    async fn replace_all(&self, symbols: &BTreeSet<String>) -> Result<()>;
}

/// A shared store handle is itself a store, so the same backend can be
/// handed to the monitor and inspected elsewhere.
#[async_trait]
impl<S: SnapshotStore + ?Sized> SnapshotStore for std::sync::Arc<S> {
    async fn load(&self) -> Result<BTreeSet<String>> {
        (**self).load().await
    }

    async fn replace_all(&self, symbols: &BTreeSet<String>) -> Result<()> {
        (**self).replace_all(symbols).await
    }
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// Volatile snapshot store. State lives in process memory and resets on
/// restart; suitable for tests and throwaway runs.
#[derive(Default)]
pub struct MemorySnapshotStore {
    symbols: Mutex<BTreeSet<String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start pre-seeded, as if a previous cycle had committed `symbols`.
    pub fn with_symbols(symbols: impl IntoIterator<Item = String>) -> Self {
        Self {
            symbols: Mutex::new(symbols.into_iter().collect()),
        }
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> Result<BTreeSet<String>> {
        let guard = self
            .symbols
            .lock()
            .map_err(|_| anyhow!("snapshot lock poisoned"))?;
        Ok(guard.clone())
    }

    async fn replace_all(&self, symbols: &BTreeSet<String>) -> Result<()> {
        let mut guard = self
            .symbols
            .lock()
            .map_err(|_| anyhow!("snapshot lock poisoned"))?;
        *guard = symbols.clone();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
