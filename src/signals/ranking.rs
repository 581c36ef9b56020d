//! Deterministic ordering of collected results

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::models::result::ScreenResult;

/// Secondary key applied after conditions met (descending).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Entry price descending, then symbol ascending.
    #[default]
    Price,
    /// Symbol ascending.
    Symbol,
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" => Ok(TieBreak::Price),
            "symbol" | "name" => Ok(TieBreak::Symbol),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultRanker {
    pub tie_break: TieBreak,
}

impl ResultRanker {
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    /// Sort into a total order that does not depend on arrival order.
    pub fn rank(&self, mut results: Vec<ScreenResult>) -> Vec<ScreenResult> {
        results.sort_by(|a, b| self.compare(a, b));
        results
    }

    pub fn compare(&self, a: &ScreenResult, b: &ScreenResult) -> Ordering {
        let by_symbol = || {
            a.symbol
                .cmp(&b.symbol)
                .then_with(|| a.instrument_key.cmp(&b.instrument_key))
        };

        b.conditions_met
            .cmp(&a.conditions_met)
            .then_with(|| match self.tie_break {
                TieBreak::Price => b.entry_price.total_cmp(&a.entry_price).then_with(by_symbol),
                TieBreak::Symbol => by_symbol(),
            })
    }
}
