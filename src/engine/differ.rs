//! Symbol set difference.
//!
//! Pure function over symbol sets: `added = current − previous`,
//! `dropped = previous − current`. `BTreeSet` gives lexicographic
//! iteration for free, so rendered output is reproducible.

use std::collections::BTreeSet;

/// Membership changes between two observations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolDiff {
    pub added: BTreeSet<String>,
    pub dropped: BTreeSet<String>,
}

impl SymbolDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.dropped.is_empty()
    }
}

/// Compute the membership diff between the previous snapshot and the
/// current fetch. No hidden state; the same inputs always produce the
/// same output.
pub fn diff(previous: &BTreeSet<String>, current: &BTreeSet<String>) -> SymbolDiff {
    SymbolDiff {
        added: current.difference(previous).cloned().collect(),
        dropped: previous.difference(current).cloned().collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
