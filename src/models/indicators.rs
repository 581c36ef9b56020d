use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::candle::{Candle, Series};

/// One indicator output aligned index-for-index with its source series.
/// `None` marks positions before the warm-up length.
pub type IndicatorSeries = Vec<Option<f64>>;

/// Indicator formula and its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorKind {
    Sma { period: usize },
    Ema { span: usize },
    Rsi { period: usize },
    StochRsi { period: usize },
    Macd { fast: usize, slow: usize, signal: usize },
    Adx { period: usize },
    Bollinger { period: usize, std_dev: f64 },
    Atr { period: usize },
    VolumeSma { period: usize },
    HighestHigh { period: usize },
}

impl IndicatorKind {
    /// Candles needed before every output of this indicator is defined.
    pub fn warmup(&self) -> usize {
        match *self {
            IndicatorKind::Sma { period }
            | IndicatorKind::Bollinger { period, .. }
            | IndicatorKind::Atr { period }
            | IndicatorKind::VolumeSma { period } => period,
            IndicatorKind::Ema { span } => span,
            IndicatorKind::Rsi { period } => period + 1,
            IndicatorKind::StochRsi { period } | IndicatorKind::Adx { period } => 2 * period,
            IndicatorKind::Macd { fast, slow, signal } => fast.max(slow) + signal.saturating_sub(1),
            IndicatorKind::HighestHigh { .. } => 1,
        }
    }

    /// Output components for multi-line indicators; empty for single-line ones.
    pub fn components(&self) -> &'static [&'static str] {
        match self {
            IndicatorKind::Macd { .. } => &["line", "signal", "histogram"],
            IndicatorKind::Bollinger { .. } => &["upper", "middle", "lower"],
            IndicatorKind::Adx { .. } => &["adx", "plus_di", "minus_di"],
            _ => &[],
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorKind::Sma { period } => write!(f, "sma:{}", period),
            IndicatorKind::Ema { span } => write!(f, "ema:{}", span),
            IndicatorKind::Rsi { period } => write!(f, "rsi:{}", period),
            IndicatorKind::StochRsi { period } => write!(f, "stoch_rsi:{}", period),
            IndicatorKind::Macd { fast, slow, signal } => {
                write!(f, "macd:{},{},{}", fast, slow, signal)
            }
            IndicatorKind::Adx { period } => write!(f, "adx:{}", period),
            IndicatorKind::Bollinger { period, std_dev } => write!(f, "bb:{},{}", period, std_dev),
            IndicatorKind::Atr { period } => write!(f, "atr:{}", period),
            IndicatorKind::VolumeSma { period } => write!(f, "vol_sma:{}", period),
            IndicatorKind::HighestHigh { period } => write!(f, "high:{}", period),
        }
    }
}

/// A named request for one indicator.
///
/// Single-line indicators publish under `name`; multi-line ones publish
/// `{name}_{component}` (e.g. `macd_line`, `bb_upper`, `dmi_plus_di`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRequest {
    pub name: String,
    #[serde(flatten)]
    pub kind: IndicatorKind,
}

impl IndicatorRequest {
    pub fn new(name: impl Into<String>, kind: IndicatorKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn output_keys(&self) -> Vec<String> {
        let components = self.kind.components();
        if components.is_empty() {
            vec![self.name.clone()]
        } else {
            components
                .iter()
                .map(|component| format!("{}_{}", self.name, component))
                .collect()
        }
    }
}

/// Derived series for one symbol, keyed by output name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndicatorSet {
    len: usize,
    series: BTreeMap<String, IndicatorSeries>,
}

impl IndicatorSet {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            series: BTreeMap::new(),
        }
    }

    /// Insert an output. Lengths are normalised to the source length so the
    /// alignment invariant holds even for a malformed formula result.
    pub fn insert(&mut self, key: impl Into<String>, mut values: IndicatorSeries) {
        values.resize(self.len, None);
        self.series.insert(key.into(), values);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&[Option<f64>]> {
        self.series.get(key).map(Vec::as_slice)
    }

    pub fn value_at(&self, key: &str, index: usize) -> Option<f64> {
        self.series
            .get(key)
            .and_then(|values| values.get(index).copied().flatten())
            .filter(|v| v.is_finite())
    }

    pub fn latest(&self, key: &str) -> Option<f64> {
        self.len.checked_sub(1).and_then(|i| self.value_at(key, i))
    }
}

/// Latest candle plus the latest value of each indicator for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub symbol: String,
    pub latest: Candle,
    pub previous: Option<Candle>,
    values: BTreeMap<String, Option<f64>>,
}

impl Snapshot {
    pub fn capture(series: &Series, indicators: &IndicatorSet) -> Self {
        let values = indicators
            .keys()
            .map(|key| (key.to_string(), indicators.latest(key)))
            .collect();

        Self {
            symbol: series.symbol().to_string(),
            latest: *series.latest(),
            previous: series.previous().copied(),
            values,
        }
    }

    pub fn from_candles(symbol: impl Into<String>, latest: Candle, previous: Option<Candle>) -> Self {
        Self {
            symbol: symbol.into(),
            latest,
            previous,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: Option<f64>) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Latest value of an indicator output; undefined, missing, and
    /// non-finite values all read as `None`.
    pub fn value(&self, key: &str) -> Option<f64> {
        self.values
            .get(key)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
    }
}
