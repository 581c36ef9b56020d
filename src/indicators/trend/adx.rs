//! ADX (Average Directional Index) with +DI / -DI

use crate::common::math;
use crate::models::indicators::IndicatorSeries;

/// Directional movement lines aligned with the source candles.
#[derive(Debug, Clone, PartialEq)]
pub struct DmiSeries {
    pub adx: IndicatorSeries,
    pub plus_di: IndicatorSeries,
    pub minus_di: IndicatorSeries,
}

impl DmiSeries {
    fn undefined(len: usize) -> Self {
        Self {
            adx: vec![None; len],
            plus_di: vec![None; len],
            minus_di: vec![None; len],
        }
    }
}

/// Calculate ADX, +DI and -DI using Wilder smoothing.
///
/// TR, +DM and -DM are summed over the first `period` bar transitions and
/// then smoothed as `prev - prev / period + current`. +DI and -DI are
/// defined from index `period`. ADX is seeded with the mean of the first
/// `period` DX values and is defined from index `2 * period - 1`.
pub fn calculate_dmi(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> DmiSeries {
    let n = highs.len().min(lows.len()).min(closes.len());
    let mut out = DmiSeries::undefined(n);
    if period == 0 || n < period + 1 {
        return out;
    }

    let period_f = period as f64;
    let mut tr = Vec::with_capacity(n - 1);
    let mut plus_dm = Vec::with_capacity(n - 1);
    let mut minus_dm = Vec::with_capacity(n - 1);

    for i in 1..n {
        tr.push(math::true_range(highs[i], lows[i], closes[i - 1]));

        let up_move = highs[i] - highs[i - 1];
        let down_move = lows[i - 1] - lows[i];
        plus_dm.push(if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        });
        minus_dm.push(if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        });
    }

    let mut smooth_tr: f64 = tr[..period].iter().sum();
    let mut smooth_plus: f64 = plus_dm[..period].iter().sum();
    let mut smooth_minus: f64 = minus_dm[..period].iter().sum();

    // Transition j ends at candle j + 1.
    let mut dx_values = Vec::with_capacity(n - period);
    for j in (period - 1)..tr.len() {
        if j >= period {
            smooth_tr = smooth_tr - smooth_tr / period_f + tr[j];
            smooth_plus = smooth_plus - smooth_plus / period_f + plus_dm[j];
            smooth_minus = smooth_minus - smooth_minus / period_f + minus_dm[j];
        }

        let (plus_di, minus_di) = if smooth_tr > 0.0 {
            (100.0 * smooth_plus / smooth_tr, 100.0 * smooth_minus / smooth_tr)
        } else {
            (0.0, 0.0)
        };
        let index = j + 1;
        out.plus_di[index] = Some(plus_di);
        out.minus_di[index] = Some(minus_di);
        dx_values.push((index, compute_dx(plus_di, minus_di)));
    }

    if dx_values.len() < period {
        return out;
    }

    let seed = dx_values[..period].iter().map(|(_, dx)| dx).sum::<f64>() / period_f;
    let mut adx = seed;
    out.adx[dx_values[period - 1].0] = Some(adx);
    for &(index, dx) in &dx_values[period..] {
        adx = (adx * (period_f - 1.0) + dx) / period_f;
        out.adx[index] = Some(adx);
    }

    out
}

fn compute_dx(plus_di: f64, minus_di: f64) -> f64 {
    let sum = plus_di + minus_di;
    if sum > 0.0 {
        100.0 * (plus_di - minus_di).abs() / sum
    } else {
        0.0
    }
}
