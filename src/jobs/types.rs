//! Job and outcome types for the per-symbol pipeline

use serde::Serialize;

use crate::models::result::{ScreenResult, SkipReason};
use crate::models::symbol::SymbolEntry;

/// One symbol queued for screening. `index` is its position in the input list.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolJob {
    pub index: usize,
    pub symbol: SymbolEntry,
}

/// Terminal state of one symbol pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SymbolOutcome {
    Matched(ScreenResult),
    /// Evaluated but below the threshold.
    Rejected {
        conditions_met: usize,
        total_conditions: usize,
    },
    Skipped(SkipReason),
    /// Authentication failure; the scan must stop.
    Aborted(String),
}

impl SymbolOutcome {
    pub fn is_abort(&self) -> bool {
        matches!(self, SymbolOutcome::Aborted(_))
    }
}
