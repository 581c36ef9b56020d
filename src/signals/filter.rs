//! Cheap price and liquidity pre-screen run before indicator computation

use serde::{Deserialize, Serialize};

use crate::models::candle::Candle;

pub const DEFAULT_PRICE_FLOOR: f64 = 50.0;
pub const DEFAULT_VOLUME_FLOOR: f64 = 50_000.0;
pub const DEFAULT_VOLUME_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterDecision {
    Accept,
    NoData,
    BelowPriceFloor { close: f64, floor: f64 },
    BelowVolumeFloor { average: f64, floor: f64 },
}

impl FilterDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FilterDecision::Accept)
    }
}

/// Rejects penny stocks and illiquid symbols.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarlyFilter {
    pub price_floor: f64,
    pub volume_floor: f64,
    /// Trailing candles averaged for the liquidity check.
    pub volume_window: usize,
}

impl Default for EarlyFilter {
    fn default() -> Self {
        Self {
            price_floor: DEFAULT_PRICE_FLOOR,
            volume_floor: DEFAULT_VOLUME_FLOOR,
            volume_window: DEFAULT_VOLUME_WINDOW,
        }
    }
}

impl EarlyFilter {
    pub fn new(price_floor: f64, volume_floor: f64, volume_window: usize) -> Self {
        Self {
            price_floor,
            volume_floor,
            volume_window,
        }
    }

    /// Only the latest close and the trailing volume window are read.
    ///
    /// The liquidity check needs a full window; with fewer candles only the
    /// price floor applies.
    pub fn check(&self, candles: &[Candle]) -> FilterDecision {
        let Some(latest) = candles.last() else {
            return FilterDecision::NoData;
        };

        if latest.close < self.price_floor {
            return FilterDecision::BelowPriceFloor {
                close: latest.close,
                floor: self.price_floor,
            };
        }

        if self.volume_window > 0 && candles.len() >= self.volume_window {
            let window = &candles[candles.len() - self.volume_window..];
            let average = window.iter().map(|c| c.volume).sum::<f64>() / window.len() as f64;
            if average < self.volume_floor {
                return FilterDecision::BelowVolumeFloor {
                    average,
                    floor: self.volume_floor,
                };
            }
        }

        FilterDecision::Accept
    }

    pub fn accepts(&self, candles: &[Candle]) -> bool {
        self.check(candles).is_accepted()
    }
}
