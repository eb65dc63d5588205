//! Full-cycle scenarios: scripted fetches through a real parser, differ,
//! and store, asserting the failure-isolation and persistence rules.

use std::collections::BTreeSet;
use std::sync::Arc;

use tickerwatch::engine::monitor::Monitor;
use tickerwatch::engine::parser::RecordParser;
use tickerwatch::storage::{MemorySnapshotStore, SnapshotStore, SqliteSnapshotStore};
use tickerwatch::types::MonitorError;

use crate::mock_source::{empty_page, page, row, Fetch, RecordingReporter, ScriptedSource};

fn set(symbols: &[&str]) -> BTreeSet<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

fn monitor(
    script: Vec<Fetch>,
    store: Arc<MemorySnapshotStore>,
    reporter: RecordingReporter,
) -> Monitor {
    Monitor::new(
        Box::new(ScriptedSource::new(script)),
        RecordParser::new(11).unwrap(),
        Box::new(store),
        Box::new(reporter),
    )
}

#[tokio::test]
async fn first_run_reports_everything_added() {
    let store = Arc::new(MemorySnapshotStore::new());
    let reporter = RecordingReporter::new();
    let m = monitor(
        vec![Fetch::Page(page(&["A", "B"], 2))],
        store.clone(),
        reporter.clone(),
    );

    let outcome = m.run_cycle().await.unwrap();

    assert_eq!(outcome.report.added, set(&["A", "B"]));
    assert!(outcome.report.dropped.is_empty());
    assert_eq!(store.load().await.unwrap(), set(&["A", "B"]));

    let published = reporter.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].total_observed, 2);
}

#[tokio::test]
async fn membership_change_detected_across_cycles() {
    let store = Arc::new(MemorySnapshotStore::new());
    let reporter = RecordingReporter::new();
    let m = monitor(
        vec![
            Fetch::Page(page(&["AAPL", "MSFT", "GOOG"], 3)),
            Fetch::Page(page(&["AAPL", "MSFT", "TSLA"], 3)),
        ],
        store.clone(),
        reporter.clone(),
    );

    m.run_cycle().await.unwrap();
    let outcome = m.run_cycle().await.unwrap();

    assert_eq!(outcome.report.added, set(&["TSLA"]));
    assert_eq!(outcome.report.dropped, set(&["GOOG"]));
    assert_eq!(store.load().await.unwrap(), set(&["AAPL", "MSFT", "TSLA"]));
}

#[tokio::test]
async fn empty_fetch_aborts_and_preserves_snapshot() {
    let store = Arc::new(MemorySnapshotStore::with_symbols(set(&["AAPL"])));
    let reporter = RecordingReporter::new();
    let m = monitor(
        vec![Fetch::Page(empty_page())],
        store.clone(),
        reporter.clone(),
    );

    let err = m.run_cycle().await.unwrap_err();

    assert!(matches!(err, MonitorError::EmptyResult));
    // Not interpreted as "everything dropped": no report, store untouched
    assert!(reporter.published().is_empty());
    assert_eq!(store.load().await.unwrap(), set(&["AAPL"]));
}

#[tokio::test]
async fn transport_error_preserves_snapshot_and_next_cycle_proceeds() {
    let store = Arc::new(MemorySnapshotStore::with_symbols(set(&["AAPL"])));
    let reporter = RecordingReporter::new();
    let m = monitor(
        vec![
            Fetch::Error("connection reset by peer"),
            Fetch::Page(page(&["AAPL", "TSLA"], 2)),
        ],
        store.clone(),
        reporter.clone(),
    );

    let err = m.run_cycle().await.unwrap_err();
    assert!(matches!(err, MonitorError::Fetch(_)));
    assert_eq!(store.load().await.unwrap(), set(&["AAPL"]));

    // The scheduler keeps ticking; the next cycle diffs against the
    // untouched snapshot.
    let outcome = m.run_cycle().await.unwrap();
    assert_eq!(outcome.report.added, set(&["TSLA"]));
    assert!(outcome.report.dropped.is_empty());
    assert_eq!(store.load().await.unwrap(), set(&["AAPL", "TSLA"]));
}

#[tokio::test]
async fn blocked_page_is_parse_failure() {
    let store = Arc::new(MemorySnapshotStore::with_symbols(set(&["AAPL"])));
    let reporter = RecordingReporter::new();
    let m = monitor(
        vec![Fetch::Page(
            "<html><body><h1>Access denied</h1></body></html>".to_string(),
        )],
        store.clone(),
        reporter.clone(),
    );

    let err = m.run_cycle().await.unwrap_err();
    assert!(matches!(err, MonitorError::Parse(_)));
    assert_eq!(store.load().await.unwrap(), set(&["AAPL"]));
}

#[tokio::test]
async fn unchanged_cycle_publishes_and_recommits() {
    let store = Arc::new(MemorySnapshotStore::new());
    let reporter = RecordingReporter::new();
    let m = monitor(
        vec![
            Fetch::Page(page(&["A", "B"], 2)),
            Fetch::Page(page(&["A", "B"], 2)),
        ],
        store.clone(),
        reporter.clone(),
    );

    m.run_cycle().await.unwrap();
    let outcome = m.run_cycle().await.unwrap();

    assert!(outcome.report.is_unchanged());
    let published = reporter.published();
    assert_eq!(published.len(), 2);
    assert!(published[1].is_unchanged());
    assert_eq!(store.load().await.unwrap(), set(&["A", "B"]));
}

#[tokio::test]
async fn duplicate_rows_never_report_spuriously() {
    let store = Arc::new(MemorySnapshotStore::new());
    let reporter = RecordingReporter::new();

    // Same symbol twice in one page
    let dup_page = format!(
        "<html><body><table class=\"screener_table\"><tbody>{}{}{}</tbody></table></body></html>",
        row("AAPL"),
        row("MSFT"),
        row("AAPL"),
    );
    let m = monitor(
        vec![Fetch::Page(dup_page.clone()), Fetch::Page(dup_page)],
        store.clone(),
        reporter.clone(),
    );

    let first = m.run_cycle().await.unwrap();
    assert_eq!(first.report.total_observed, 2);
    assert_eq!(first.report.added, set(&["AAPL", "MSFT"]));

    let second = m.run_cycle().await.unwrap();
    assert!(second.report.is_unchanged());
}

#[tokio::test]
async fn coverage_warning_flagged_when_source_has_more_pages() {
    let store = Arc::new(MemorySnapshotStore::new());
    let reporter = RecordingReporter::new();
    let m = monitor(
        vec![Fetch::Page(page(&["A", "B"], 10458))],
        store.clone(),
        reporter.clone(),
    );

    let outcome = m.run_cycle().await.unwrap();
    assert_eq!(outcome.report.estimated_source_total, 10458);
    assert!(outcome.report.under_coverage());
}

#[tokio::test]
async fn sqlite_snapshot_survives_monitor_restart() {
    let mut path = std::env::temp_dir();
    path.push(format!("tickerwatch_cycle_{}.db", uuid::Uuid::new_v4()));
    let path = path.to_string_lossy().to_string();

    {
        let store = SqliteSnapshotStore::open(&path).await.unwrap();
        let m = Monitor::new(
            Box::new(ScriptedSource::new(vec![Fetch::Page(page(&["AAPL", "GOOG"], 2))])),
            RecordParser::new(11).unwrap(),
            Box::new(store),
            Box::new(RecordingReporter::new()),
        );
        m.run_cycle().await.unwrap();
    }

    // A fresh process diffs against what the last run committed
    let store = SqliteSnapshotStore::open(&path).await.unwrap();
    assert_eq!(store.load().await.unwrap(), set(&["AAPL", "GOOG"]));

    let reporter = RecordingReporter::new();
    let m = Monitor::new(
        Box::new(ScriptedSource::new(vec![Fetch::Page(page(&["AAPL"], 1))])),
        RecordParser::new(11).unwrap(),
        Box::new(store),
        Box::new(reporter.clone()),
    );
    let outcome = m.run_cycle().await.unwrap();
    assert_eq!(outcome.report.dropped, set(&["GOOG"]));

    let _ = std::fs::remove_file(&path);
}
