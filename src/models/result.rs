//! Scan outputs: accepted results, skip categories and the scan summary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Why a symbol was excluded before it could be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Timeout,
    Empty,
    Malformed,
    InsufficientHistory,
    Transport,
    Computation,
    /// Rejected by the early price/liquidity filter.
    Filtered,
}

impl SkipReason {
    pub const ALL: [SkipReason; 7] = [
        SkipReason::Timeout,
        SkipReason::Empty,
        SkipReason::Malformed,
        SkipReason::InsufficientHistory,
        SkipReason::Transport,
        SkipReason::Computation,
        SkipReason::Filtered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Timeout => "timeout",
            SkipReason::Empty => "empty",
            SkipReason::Malformed => "malformed",
            SkipReason::InsufficientHistory => "insufficient_history",
            SkipReason::Transport => "transport",
            SkipReason::Computation => "computation",
            SkipReason::Filtered => "filtered",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secondary figures reported alongside an accepted symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AuxMetrics {
    pub rsi: Option<f64>,
    /// Latest volume over its moving average.
    pub volume_ratio: Option<f64>,
    /// ATR as a percentage of the close.
    pub atr_pct: Option<f64>,
    /// `(low / previous high - 1) * 100`.
    pub gap_pct: Option<f64>,
}

/// A symbol that met the configured threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenResult {
    pub symbol: String,
    pub instrument_key: String,
    pub conditions_met: usize,
    pub total_conditions: usize,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub target: f64,
    /// True when ATR was undefined and `entry * 0.02` stood in for it.
    pub atr_is_proxy: bool,
    pub aux: AuxMetrics,
}

impl ScreenResult {
    /// `"met/total"`, as shown in exports and digests.
    pub fn ratio_label(&self) -> String {
        format!("{}/{}", self.conditions_met, self.total_conditions)
    }

    pub fn risk_reward(&self) -> Option<f64> {
        let risk = self.entry_price - self.stop_loss;
        if risk <= 0.0 {
            return None;
        }
        Some((self.target - self.entry_price) / risk)
    }
}

/// Counts for one scan. `scanned + not_attempted` equals the universe size.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanSummary {
    pub scanned: usize,
    pub matched: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
    pub not_attempted: usize,
    pub duration: Duration,
}

impl ScanSummary {
    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_insert(0) += 1;
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scanned {} | matched {} | skipped {}",
            self.scanned,
            self.matched,
            self.total_skipped()
        )?;
        if !self.skipped.is_empty() {
            let parts: Vec<String> = self
                .skipped
                .iter()
                .map(|(reason, count)| format!("{}={}", reason, count))
                .collect();
            write!(f, " ({})", parts.join(", "))?;
        }
        if self.not_attempted > 0 {
            write!(f, " | not attempted {}", self.not_attempted)?;
        }
        Ok(())
    }
}
