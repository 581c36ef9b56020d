//! RSI (Relative Strength Index) and Stochastic RSI

use crate::common::math;
use crate::models::indicators::IndicatorSeries;

/// Calculate RSI over `period` close-to-close changes.
///
/// RSI = 100 - (100 / (1 + RS)), RS = average gain / average loss, both
/// simple means over the window. A window with no losses reads 100.
/// Defined from index `period`.
pub fn calculate_rsi(closes: &[f64], period: usize) -> IndicatorSeries {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return out;
    }

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);
    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    for i in period..closes.len() {
        // Change j is between closes j and j + 1.
        let window = (i - period)..i;
        let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[window].iter().sum::<f64>() / period as f64;
        out[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }
    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

/// Calculate Stochastic RSI: where RSI sits inside its own `period`-bar range.
///
/// `(rsi - min) / (max - min) * 100`; undefined while the range is zero.
/// Defined from index `2 * period - 1`.
pub fn calculate_stoch_rsi(closes: &[f64], period: usize) -> IndicatorSeries {
    let rsi = calculate_rsi(closes, period);
    let extremes = math::rolling_extremes(&rsi, period);

    rsi.iter()
        .zip(extremes)
        .map(|(value, range)| {
            let value = (*value)?;
            let (lo, hi) = range?;
            let span = hi - lo;
            if span <= 0.0 {
                return None;
            }
            Some(((value - lo) / span * 100.0).clamp(0.0, 100.0))
        })
        .collect()
}
