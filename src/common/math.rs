//! Rolling-window math over aligned series.
//!
//! Every series function returns a vector with the same length as its input.
//! Positions before the warm-up length hold `None`.

/// Smoothing factor for an EMA of the given span: `2 / (span + 1)`.
pub fn smoothing_factor(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// One EMA step from the previous smoothed value.
pub fn ema_from_previous(value: f64, previous: f64, alpha: f64) -> f64 {
    previous + alpha * (value - previous)
}

/// Simple moving average of the last `period` values.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        out[i] = Some(window.iter().sum::<f64>() / period as f64);
    }
    out
}

/// Sample standard deviation (n - 1 denominator) of a window.
pub fn standard_deviation(window: &[f64]) -> Option<f64> {
    if window.len() < 2 {
        return None;
    }

    let mean = window.iter().sum::<f64>() / window.len() as f64;
    let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (window.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Rolling sample standard deviation over `period` values.
pub fn rolling_std(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period < 2 || values.len() < period {
        return out;
    }

    for i in (period - 1)..values.len() {
        out[i] = standard_deviation(&values[i + 1 - period..=i]);
    }
    out
}

/// Exponential moving average seeded with the first value.
///
/// The recursion runs from index 0; values are reported from index
/// `span - 1` onward.
pub fn ema(values: &[f64], span: usize) -> Vec<Option<f64>> {
    let wrapped: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    ema_defined(&wrapped, span)
}

/// Exponential moving average over a partially defined series.
///
/// Seeds with the first defined value and skips undefined positions. A value
/// is reported once `span` defined inputs have been consumed.
pub fn ema_defined(values: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if span == 0 {
        return out;
    }

    let alpha = smoothing_factor(span);
    let mut current: Option<f64> = None;
    let mut seen = 0usize;

    for (i, value) in values.iter().enumerate() {
        let Some(value) = *value else {
            continue;
        };
        current = Some(match current {
            Some(previous) => ema_from_previous(value, previous, alpha),
            None => value,
        });
        seen += 1;
        if seen >= span {
            out[i] = current;
        }
    }
    out
}

/// Rolling `(min, max)` over `period` values. A window containing an
/// undefined value is itself undefined.
pub fn rolling_extremes(values: &[Option<f64>], period: usize) -> Vec<Option<(f64, f64)>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        if window.iter().any(Option::is_none) {
            continue;
        }
        let extremes = window
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        out[i] = Some(extremes);
    }
    out
}

/// Rolling maximum that is defined from the first value (a window shorter
/// than `period` uses whatever history exists).
pub fn rolling_max_partial(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(period);
            values[start..=i].iter().copied().reduce(f64::max)
        })
        .collect()
}

/// True range of one bar given the previous close.
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    (high - low)
        .max((high - prev_close).abs())
        .max((low - prev_close).abs())
}

/// True range for every bar. The first bar has no previous close and uses
/// its own high - low.
pub fn true_ranges(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = highs.len().min(lows.len()).min(closes.len());
    (0..n)
        .map(|i| {
            if i == 0 {
                highs[0] - lows[0]
            } else {
                true_range(highs[i], lows[i], closes[i - 1])
            }
        })
        .collect()
}

/// `numerator / denominator`, undefined for a zero or non-finite result.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}
