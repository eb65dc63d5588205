//! Poll orchestrator.
//!
//! Drives one fetch → parse → diff → report → commit cycle and owns the
//! failure isolation rules: fetch and parse failures (including an empty
//! parse) abort before any store access, reporting is best-effort, and a
//! failed commit fails the cycle only after the report is out; the next
//! cycle re-diffs against whatever was last durably committed.
//!
//! The monitor holds no cycle state of its own: records, diffs, and
//! reports are cycle-local and discarded after use. Mutual exclusion
//! between cycles is the caller's job (the poll loop awaits one cycle
//! before ticking the next).

use chrono::Utc;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::engine::count;
use crate::engine::differ;
use crate::engine::parser::RecordParser;
use crate::report::ChangeReporter;
use crate::source::ScreenerSource;
use crate::storage::SnapshotStore;
use crate::types::{ChangeReport, MonitorError};

/// Everything a caller needs to observe one successful cycle.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub report: ChangeReport,
    /// The symbol set committed to the snapshot store.
    pub symbols: BTreeSet<String>,
}

/// The poll orchestrator. Owns its collaborators; constructed explicitly
/// at wiring time so cycles are testable without a running scheduler.
pub struct Monitor {
    source: Box<dyn ScreenerSource>,
    parser: RecordParser,
    store: Box<dyn SnapshotStore>,
    reporter: Box<dyn ChangeReporter>,
}

impl Monitor {
    pub fn new(
        source: Box<dyn ScreenerSource>,
        parser: RecordParser,
        store: Box<dyn SnapshotStore>,
        reporter: Box<dyn ChangeReporter>,
    ) -> Self {
        Self {
            source,
            parser,
            store,
            reporter,
        }
    }

    /// Run one complete cycle. On success the snapshot store reflects the
    /// current fetch; on any error it holds whatever was last durably
    /// committed.
    pub async fn run_cycle(&self) -> Result<CycleOutcome, MonitorError> {
        // FETCHING
        let payload = self
            .source
            .fetch_page()
            .await
            .map_err(|e| MonitorError::Fetch(e.to_string()))?;
        debug!(source = self.source.name(), bytes = payload.len(), "Page fetched");

        // PARSING. An empty result is operationally indistinguishable from
        // a broken selector or blocked request and must not be read as
        // "every symbol disappeared".
        let records = self.parser.parse(&payload)?;
        if records.is_empty() {
            return Err(MonitorError::EmptyResult);
        }

        let current: BTreeSet<String> =
            records.iter().map(|r| r.symbol.clone()).collect();

        // DIFFING
        let previous = self
            .store
            .load()
            .await
            .map_err(|e| MonitorError::Persistence(e.to_string()))?;
        let changes = differ::diff(&previous, &current);

        let report = ChangeReport {
            added: changes.added,
            dropped: changes.dropped,
            timestamp: Utc::now(),
            total_observed: current.len(),
            estimated_source_total: count::estimate_total(&payload),
        };

        info!(
            observed = report.total_observed,
            added = report.added.len(),
            dropped = report.dropped.len(),
            source_total = report.estimated_source_total,
            "Cycle diff computed"
        );

        // REPORTING: best-effort, cannot fail the cycle.
        self.reporter.publish(&report, &records);

        // COMMITTING: unconditional, even when the diff is empty, so the
        // store always reflects the most recent successful fetch.
        self.store
            .replace_all(&current)
            .await
            .map_err(|e| MonitorError::Persistence(e.to_string()))?;

        Ok(CycleOutcome {
            report,
            symbols: current,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
