//! Change reporting.
//!
//! The monitor hands each cycle's `ChangeReport` to a reporter. Delivery
//! is best-effort by contract: a reporter can never fail the cycle.
//! The shipped reporter writes structured log lines; sound, webhook, or
//! mail sinks would slot in behind the same trait at the wiring layer.

use tracing::{info, warn};

use crate::types::{ChangeReport, TickerRecord};

/// Sink for cycle change reports.
#[cfg_attr(test, mockall::automock)]
pub trait ChangeReporter: Send + Sync {
    /// Publish one cycle's report. `records` is the current fetch, used
    /// to attach detail to added symbols — dropped symbols have no
    /// current-row details by nature.
    fn publish(&self, report: &ChangeReport, records: &[TickerRecord]);
}

/// Reporter that renders the change report through `tracing`.
pub struct LogReporter;

impl ChangeReporter for LogReporter {
    fn publish(&self, report: &ChangeReport, records: &[TickerRecord]) {
        if report.is_unchanged() {
            info!(total = report.total_observed, "No changes detected");
        } else {
            if !report.added.is_empty() {
                info!(
                    count = report.added.len(),
                    symbols = ?report.added,
                    "ADDED tickers"
                );
                for symbol in &report.added {
                    if let Some(r) = records.iter().find(|r| &r.symbol == symbol) {
                        info!(detail = %r, "Added ticker");
                    }
                }
            }
            if !report.dropped.is_empty() {
                info!(
                    count = report.dropped.len(),
                    symbols = ?report.dropped,
                    "DROPPED tickers"
                );
                for symbol in &report.dropped {
                    info!(symbol = %symbol, "Dropped ticker");
                }
            }
        }

        if report.under_coverage() {
            warn!(
                observed = report.total_observed,
                source_total = report.estimated_source_total,
                "Only the first page is monitored; source advertises more results"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
