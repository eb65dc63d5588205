//! Deterministic test doubles for driving monitor cycles.
//!
//! `ScriptedSource` serves a queue of payloads (or transport errors) in
//! order, one per fetch. `RecordingReporter` captures every published
//! report for later assertions. All state is in-memory.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tickerwatch::report::ChangeReporter;
use tickerwatch::source::ScreenerSource;
use tickerwatch::types::{ChangeReport, TickerRecord};

/// One scripted fetch result: a page payload or a transport error message.
pub enum Fetch {
    Page(String),
    Error(&'static str),
}

/// Screener source that replays a fixed script of fetch results.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Fetch>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Fetch>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }
}

#[async_trait]
impl ScreenerSource for ScriptedSource {
    async fn fetch_page(&self) -> Result<String> {
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Fetch::Page(payload)) => Ok(payload),
            Some(Fetch::Error(msg)) => Err(anyhow!(msg)),
            None => Err(anyhow!("scripted source exhausted")),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Reporter that records every published report. Cloning shares the
/// underlying log, so a test can keep a handle after the monitor takes
/// ownership of its copy.
#[derive(Default, Clone)]
pub struct RecordingReporter {
    published: Arc<Mutex<Vec<ChangeReport>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<ChangeReport> {
        self.published.lock().unwrap().clone()
    }
}

impl ChangeReporter for RecordingReporter {
    fn publish(&self, report: &ChangeReport, _records: &[TickerRecord]) {
        self.published.lock().unwrap().push(report.clone());
    }
}

// ---------------------------------------------------------------------------
// Page builders
// ---------------------------------------------------------------------------

/// One well-formed 11-cell listing row.
pub fn row(symbol: &str) -> String {
    format!(
        "<tr><td>1</td><td><a href=\"quote.ashx?t={symbol}\">{symbol}</a></td>\
         <td>{symbol} Corp</td><td>Technology</td><td>Software</td><td>USA</td>\
         <td>1.23B</td><td>29.02</td><td>12.34</td><td>1.25%</td><td>345,678</td></tr>"
    )
}

/// A full screener page with the given symbols and advertised total.
pub fn page(symbols: &[&str], total: u32) -> String {
    let rows: String = symbols.iter().map(|s| row(s)).collect();
    format!(
        "<html><body>\
         <table><tr><td id=\"screener-total\">#1 / {total} Total</td></tr></table>\
         <table class=\"screener_table\"><tbody>{rows}</tbody></table>\
         </body></html>"
    )
}

/// A page where the listing table exists but contains no valid rows.
pub fn empty_page() -> String {
    page(&[], 0)
}
