//! Resistance levels from recent highs

use crate::common::math;
use crate::models::indicators::IndicatorSeries;

/// Highest high over the trailing `lookback` bars.
///
/// Uses whatever history exists when fewer than `lookback` bars are
/// available, so the series is defined from the first bar.
pub fn calculate_highest_high(highs: &[f64], lookback: usize) -> IndicatorSeries {
    math::rolling_max_partial(highs, lookback)
}

