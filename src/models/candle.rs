//! Daily OHLCV candles and the validated per-symbol series built from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(open: f64, high: f64, low: f64, close: f64, volume: f64, timestamp: NaiveDate) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Close above open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("series contains no candles")]
    Empty,
    #[error("candle {index} ({timestamp}) is out of order")]
    OutOfOrder { index: usize, timestamp: NaiveDate },
    #[error("duplicate candle for {timestamp}")]
    Duplicate { timestamp: NaiveDate },
    #[error("candle {index} has invalid {field}: {value}")]
    InvalidValue {
        index: usize,
        field: &'static str,
        value: f64,
    },
}

/// Ordered daily candles for one symbol.
///
/// Timestamps are strictly ascending and every value is finite and
/// non-negative. A series always holds at least one candle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    symbol: String,
    candles: Vec<Candle>,
}

impl Series {
    pub fn new(symbol: impl Into<String>, candles: Vec<Candle>) -> Result<Self, SeriesError> {
        if candles.is_empty() {
            return Err(SeriesError::Empty);
        }

        for (index, candle) in candles.iter().enumerate() {
            for (field, value) in candle.fields() {
                if !value.is_finite() || value < 0.0 {
                    return Err(SeriesError::InvalidValue { index, field, value });
                }
            }
            if index > 0 {
                let prev = candles[index - 1].timestamp;
                if candle.timestamp == prev {
                    return Err(SeriesError::Duplicate {
                        timestamp: candle.timestamp,
                    });
                }
                if candle.timestamp < prev {
                    return Err(SeriesError::OutOfOrder {
                        index,
                        timestamp: candle.timestamp,
                    });
                }
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            candles,
        })
    }

    /// Sort by timestamp first. Brokers commonly return newest-first.
    pub fn from_unsorted(
        symbol: impl Into<String>,
        mut candles: Vec<Candle>,
    ) -> Result<Self, SeriesError> {
        candles.sort_by_key(|c| c.timestamp);
        Self::new(symbol, candles)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn latest(&self) -> &Candle {
        // Non-empty by construction.
        &self.candles[self.candles.len() - 1]
    }

    pub fn previous(&self) -> Option<&Candle> {
        self.candles.len().checked_sub(2).map(|i| &self.candles[i])
    }

    /// The trailing `n` candles (or all of them when shorter).
    pub fn tail(&self, n: usize) -> &[Candle] {
        let start = self.candles.len().saturating_sub(n);
        &self.candles[start..]
    }

    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }
}
