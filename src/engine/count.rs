//! Result-count estimator.
//!
//! Best-effort extraction of the "#1 / 10458 Total" counter the screener
//! prints next to the table. Advisory only: any failure yields 0
//! (unknown) and never aborts a cycle.

use scraper::{Html, Selector};

const COUNTER_SELECTOR: &str = "#screener-total";
const FALLBACK_SELECTOR: &str = "span";

/// Extract the advertised total result count from the page payload.
/// Returns 0 when the counter is missing or unparseable.
pub fn estimate_total(html: &str) -> u32 {
    let doc = Html::parse_document(html);

    let counter = match Selector::parse(COUNTER_SELECTOR) {
        Ok(s) => s,
        Err(_) => return 0,
    };
    let fallback = match Selector::parse(FALLBACK_SELECTOR) {
        Ok(s) => s,
        Err(_) => return 0,
    };

    let text = doc
        .select(&counter)
        .next()
        .map(|el| el.text().collect::<String>())
        .or_else(|| {
            // Older layouts render the counter in an unmarked span
            doc.select(&fallback)
                .map(|el| el.text().collect::<String>())
                .find(|t| t.contains('/') && t.contains("Total"))
        });

    match text {
        Some(t) => parse_counter(&t),
        None => 0,
    }
}

/// "#1 / 10458 Total" → 10458. Anything unparseable → 0.
fn parse_counter(text: &str) -> u32 {
    let after_slash = match text.split_once('/') {
        Some((_, after)) => after,
        None => return 0,
    };
    let digits: String = after_slash
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
