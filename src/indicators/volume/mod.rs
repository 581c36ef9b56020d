//! Volume indicators

use crate::common::math;
use crate::models::indicators::IndicatorSeries;

/// SMA applied to volume instead of close.
pub fn calculate_volume_sma(volumes: &[f64], period: usize) -> IndicatorSeries {
    math::sma(volumes, period)
}

/// Latest volume relative to its moving average. Undefined when the
/// average is zero or not yet defined.
pub fn volume_ratio(volume: f64, average: Option<f64>) -> Option<f64> {
    math::ratio(volume, average?)
}
