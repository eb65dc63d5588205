//! Shared types for the tickerwatch monitor.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that source, engine, storage,
//! and dashboard modules can depend on them without circular references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Marker stored in place of a P/E figure when the source shows a
/// placeholder dash.
pub const PE_NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Ticker record
// ---------------------------------------------------------------------------

/// One row of the fetched screener listing.
///
/// All fields are carried in source string form: the listing renders
/// magnitudes like "35.08B" and "1,479,340" and nothing downstream
/// computes with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerRecord {
    /// Short uppercase code, unique key within one fetch.
    pub symbol: String,
    pub company: String,
    pub sector: String,
    pub industry: String,
    pub country: String,
    pub market_cap: String,
    /// `N/A` when the source shows a placeholder.
    pub pe: String,
    pub price: String,
    pub change: String,
    pub volume: String,
}

impl fmt::Display for TickerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}) - Price: {}, Change: {}",
            self.symbol, self.company, self.sector, self.price, self.change,
        )
    }
}

impl TickerRecord {
    /// Whether the source published a P/E figure for this row.
    pub fn has_pe(&self) -> bool {
        self.pe != PE_NOT_AVAILABLE
    }

    /// Helper to build a test record with sensible defaults.
    #[cfg(test)]
    pub fn sample(symbol: &str) -> Self {
        TickerRecord {
            symbol: symbol.to_string(),
            company: format!("{symbol} Corp"),
            sector: "Technology".to_string(),
            industry: "Software - Application".to_string(),
            country: "USA".to_string(),
            market_cap: "1.23B".to_string(),
            pe: "29.02".to_string(),
            price: "123.75".to_string(),
            change: "0.29%".to_string(),
            volume: "1,479,340".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Change report
// ---------------------------------------------------------------------------

/// Result of one monitor cycle: which symbols appeared and which vanished
/// relative to the previous successful cycle.
///
/// Ephemeral: handed to the reporting collaborator and the dashboard,
/// never persisted. `BTreeSet` keeps rendering order lexicographic and
/// reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeReport {
    /// Symbols in the current fetch but not the previous snapshot.
    pub added: BTreeSet<String>,
    /// Symbols in the previous snapshot but not the current fetch.
    pub dropped: BTreeSet<String>,
    pub timestamp: DateTime<Utc>,
    /// Distinct symbols observed in the current fetch.
    pub total_observed: usize,
    /// Total result count advertised by the source; 0 = unknown.
    pub estimated_source_total: u32,
}

impl fmt::Display for ChangeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |set: &BTreeSet<String>| {
            set.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        write!(
            f,
            "added={} [{}] dropped={} [{}] observed={} source_total={}",
            self.added.len(),
            join(&self.added),
            self.dropped.len(),
            join(&self.dropped),
            self.total_observed,
            self.estimated_source_total,
        )
    }
}

impl ChangeReport {
    /// Whether this cycle saw no membership changes.
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.dropped.is_empty()
    }

    /// Whether the source advertises more results than were retrieved
    /// (only the first page is fetched). False when the total is unknown.
    pub fn under_coverage(&self) -> bool {
        self.estimated_source_total as usize > self.total_observed
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Cycle-level failure classification.
///
/// `Fetch`, `Parse`, and `EmptyResult` abort the current cycle before the
/// snapshot store is touched. `Persistence` on commit fails the cycle after
/// the report has already been published. `CountEstimation` is advisory and
/// never surfaces from a cycle — the estimator degrades to "unknown".
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty result: no valid ticker rows in payload")]
    EmptyResult,

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Count estimation error: {0}")]
    CountEstimation(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
