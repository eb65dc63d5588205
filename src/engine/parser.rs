//! Listing-table parser.
//!
//! Converts the raw screener page into typed ticker records. Tolerant by
//! contract: rows with too few cells are skipped, a payload without the
//! listing table is a `Parse` failure with an empty result, and duplicate
//! symbols collapse to the last row seen so they never show up as
//! spurious adds or drops.

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::debug;

use crate::types::{MonitorError, TickerRecord, PE_NOT_AVAILABLE};

/// Selectors for the screener "Overview" table.
const TABLE_SELECTOR: &str = "table.screener_table";
const ROW_SELECTOR: &str = "table.screener_table tbody tr";
const CELL_SELECTOR: &str = "td";
const LINK_SELECTOR: &str = "a";

/// Placeholder token the source renders for a missing P/E figure.
const PE_PLACEHOLDER: &str = "-";

// Fixed cell positions in one listing row. Position 0 is the row number.
const COL_SYMBOL: usize = 1;
const COL_COMPANY: usize = 2;
const COL_SECTOR: usize = 3;
const COL_INDUSTRY: usize = 4;
const COL_COUNTRY: usize = 5;
const COL_MARKET_CAP: usize = 6;
const COL_PE: usize = 7;
const COL_PRICE: usize = 8;
const COL_CHANGE: usize = 9;
const COL_VOLUME: usize = 10;

/// Screener listing parser with pre-compiled selectors.
pub struct RecordParser {
    table: Selector,
    rows: Selector,
    cells: Selector,
    link: Selector,
    min_columns: usize,
}

impl RecordParser {
    /// Build a parser. `min_columns` is the row-validity threshold:
    /// rows with fewer cells are discarded, never partially populated.
    pub fn new(min_columns: usize) -> Result<Self> {
        Ok(Self {
            table: compile(TABLE_SELECTOR)?,
            rows: compile(ROW_SELECTOR)?,
            cells: compile(CELL_SELECTOR)?,
            link: compile(LINK_SELECTOR)?,
            min_columns,
        })
    }

    /// Parse the listing table out of a raw page payload.
    ///
    /// Returns records in page order. Duplicate symbols collapse to the
    /// last row seen, keeping the first occurrence's position. A payload
    /// with no listing table at all (blocked request, layout change)
    /// yields `MonitorError::Parse`.
    pub fn parse(&self, html: &str) -> Result<Vec<TickerRecord>, MonitorError> {
        let doc = Html::parse_document(html);

        if doc.select(&self.table).next().is_none() {
            return Err(MonitorError::Parse(
                "listing table not found in payload".to_string(),
            ));
        }

        let mut records: Vec<TickerRecord> = Vec::new();
        let mut by_symbol: HashMap<String, usize> = HashMap::new();

        for row in doc.select(&self.rows) {
            let cells: Vec<ElementRef> = row.select(&self.cells).collect();
            if cells.len() < self.min_columns {
                continue;
            }

            // The symbol sits inside a quote link; fall back to the bare
            // cell text for layouts that drop the anchor.
            let symbol = cells
                .get(COL_SYMBOL)
                .map(|cell| {
                    cell.select(&self.link)
                        .next()
                        .map(|a| cell_text(&a))
                        .unwrap_or_else(|| cell_text(cell))
                })
                .unwrap_or_default();

            if symbol.is_empty() {
                debug!("Skipping row with empty symbol cell");
                continue;
            }

            let pe_raw = cell_at(&cells, COL_PE);
            let pe = if pe_raw == PE_PLACEHOLDER {
                PE_NOT_AVAILABLE.to_string()
            } else {
                pe_raw
            };

            let record = TickerRecord {
                symbol: symbol.clone(),
                company: cell_at(&cells, COL_COMPANY),
                sector: cell_at(&cells, COL_SECTOR),
                industry: cell_at(&cells, COL_INDUSTRY),
                country: cell_at(&cells, COL_COUNTRY),
                market_cap: cell_at(&cells, COL_MARKET_CAP),
                pe,
                price: cell_at(&cells, COL_PRICE),
                change: cell_at(&cells, COL_CHANGE),
                volume: cell_at(&cells, COL_VOLUME),
            };

            match by_symbol.get(&symbol) {
                // Last-seen wins on non-key fields
                Some(&i) => records[i] = record,
                None => {
                    by_symbol.insert(symbol, records.len());
                    records.push(record);
                }
            }
        }

        Ok(records)
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("Invalid selector {selector}: {e:?}"))
}

/// Trimmed text content of one cell; empty for out-of-range positions.
fn cell_at(cells: &[ElementRef], index: usize) -> String {
    cells.get(index).map(cell_text).unwrap_or_default()
}

fn cell_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
