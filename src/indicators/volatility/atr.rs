//! ATR (Average True Range) indicator

use crate::common::math;
use crate::models::indicators::IndicatorSeries;

/// Calculate ATR as the simple rolling mean of true range.
///
/// The first bar has no previous close, so its true range is high - low.
/// Defined from index `period - 1`.
pub fn calculate_atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> IndicatorSeries {
    let tr = math::true_ranges(highs, lows, closes);
    math::sma(&tr, period)
}
