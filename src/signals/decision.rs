//! Entry, stop-loss and target synthesis for accepted symbols

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stand-in ATR as a fraction of entry when ATR is undefined.
pub const FALLBACK_ATR_PCT: f64 = 0.02;
pub const DEFAULT_MAX_STOP_PCT: f64 = 0.05;

/// How the stop is bounded below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum StopPolicy {
    /// `max(entry - k * ATR, entry * (1 - max_loss_pct))`.
    Capped { max_loss_pct: f64 },
    /// `max(entry - k * ATR, lower Bollinger band)`. Falls back to the
    /// default cap when the band is undefined or not below entry.
    LowerBand,
}

impl Default for StopPolicy {
    fn default() -> Self {
        StopPolicy::Capped {
            max_loss_pct: DEFAULT_MAX_STOP_PCT,
        }
    }
}

impl FromStr for StopPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "capped" | "cap" => Ok(StopPolicy::default()),
            "band" | "lower_band" | "bb" => Ok(StopPolicy::LowerBand),
            other => Err(format!("unknown stop policy '{}'", other)),
        }
    }
}

impl fmt::Display for StopPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopPolicy::Capped { max_loss_pct } => write!(f, "capped({}%)", max_loss_pct * 100.0),
            StopPolicy::LowerBand => f.write_str("lower_band"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeParams {
    pub stop_atr_multiple: f64,
    pub target_atr_multiple: f64,
    pub stop_policy: StopPolicy,
}

impl Default for TradeParams {
    fn default() -> Self {
        Self {
            stop_atr_multiple: 2.0,
            target_atr_multiple: 3.0,
            stop_policy: StopPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeLevels {
    pub entry: f64,
    pub stop_loss: f64,
    pub target: f64,
    /// ATR actually used, possibly the fallback.
    pub atr: f64,
    pub atr_is_proxy: bool,
}

impl TradeLevels {
    /// Levels for a long entry at `entry`.
    ///
    /// An undefined, non-positive or non-finite ATR is replaced by
    /// `entry * FALLBACK_ATR_PCT`.
    pub fn synthesize(
        entry: f64,
        atr: Option<f64>,
        lower_band: Option<f64>,
        params: &TradeParams,
    ) -> Self {
        let (atr, atr_is_proxy) = match atr.filter(|a| a.is_finite() && *a > 0.0) {
            Some(atr) => (atr, false),
            None => (entry * FALLBACK_ATR_PCT, true),
        };

        let atr_stop = entry - atr * params.stop_atr_multiple;
        let capped = |max_loss_pct: f64| atr_stop.max(entry * (1.0 - max_loss_pct));
        let stop_loss = match params.stop_policy {
            StopPolicy::Capped { max_loss_pct } => capped(max_loss_pct),
            // A band at or above entry cannot bound a long stop.
            StopPolicy::LowerBand => match lower_band.filter(|b| b.is_finite() && *b < entry) {
                Some(band) => atr_stop.max(band),
                None => capped(DEFAULT_MAX_STOP_PCT),
            },
        };

        Self {
            entry,
            stop_loss,
            target: entry + atr * params.target_atr_multiple,
            atr,
            atr_is_proxy,
        }
    }
}
