//! Dashboard route handlers and shared observation state.
//!
//! The poll loop records each cycle outcome into `WatchState`; handlers
//! only ever read a cloned snapshot of it. Strictly read-only: cycles
//! cannot be triggered from here.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::types::ChangeReport;

pub type AppState = Arc<WatchState>;

/// Point-in-time view of the monitor, serialized as-is on `/api/status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub started_at: DateTime<Utc>,
    pub cycles_run: u64,
    pub cycles_failed: u64,
    /// Symbols committed by the last successful cycle.
    pub symbols: BTreeSet<String>,
    pub last_report: Option<ChangeReport>,
    pub last_error: Option<String>,
}

/// Shared observation state, updated by the poll loop after each cycle.
pub struct WatchState {
    inner: Mutex<StatusSnapshot>,
}

impl Default for WatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchState {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StatusSnapshot {
                started_at: Utc::now(),
                cycles_run: 0,
                cycles_failed: 0,
                symbols: BTreeSet::new(),
                last_report: None,
                last_error: None,
            }),
        }
    }

    pub fn record_success(&self, report: &ChangeReport, symbols: &BTreeSet<String>) {
        let mut inner = self.lock();
        inner.cycles_run += 1;
        inner.symbols = symbols.clone();
        inner.last_report = Some(report.clone());
        inner.last_error = None;
    }

    pub fn record_failure(&self, error: &str) {
        let mut inner = self.lock();
        inner.cycles_run += 1;
        inner.cycles_failed += 1;
        inner.last_error = Some(error.to_string());
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StatusSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn get_status(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(state.snapshot())
}

pub async fn get_snapshot(State(state): State<AppState>) -> Json<BTreeSet<String>> {
    Json(state.snapshot().symbols)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
