//! Bollinger Bands indicator

use crate::common::math;
use crate::models::indicators::IndicatorSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub upper: IndicatorSeries,
    pub middle: IndicatorSeries,
    pub lower: IndicatorSeries,
}

/// Calculate Bollinger Bands
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_dev * sample standard deviation)
/// Lower Band = Middle - (std_dev * sample standard deviation)
pub fn calculate_bollinger_bands(closes: &[f64], period: usize, std_dev: f64) -> BollingerSeries {
    let middle = math::sma(closes, period);
    let deviation = math::rolling_std(closes, period);

    let band = |sign: f64| -> IndicatorSeries {
        middle
            .iter()
            .zip(&deviation)
            .map(|(m, sd)| Some((*m)? + sign * std_dev * (*sd)?))
            .collect()
    };
    let upper = band(1.0);
    let lower = band(-1.0);

    BollingerSeries {
        upper,
        middle,
        lower,
    }
}

