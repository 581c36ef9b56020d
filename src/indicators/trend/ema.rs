//! EMA and SMA (moving averages)

use crate::common::math;
use crate::models::indicators::IndicatorSeries;

/// EMA of `values` with smoothing factor `2 / (span + 1)`.
///
/// Seeded with the first value; defined from index `span - 1`.
pub fn calculate_ema(values: &[f64], span: usize) -> IndicatorSeries {
    math::ema(values, span)
}

/// Arithmetic mean of the last `period` values; defined from index `period - 1`.
pub fn calculate_sma(values: &[f64], period: usize) -> IndicatorSeries {
    math::sma(values, period)
}
