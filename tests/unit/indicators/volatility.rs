//! Unit tests for Bollinger Bands and ATR

use equiscan::indicators::volatility::{calculate_atr, calculate_bollinger_bands};

use crate::fixtures::{assert_close, uptrend_candles};

#[test]
fn test_bollinger_sample_deviation() {
    let bands = calculate_bollinger_bands(&[1.0, 2.0, 3.0, 4.0, 5.0], 5, 2.0);
    let sd = 2.5_f64.sqrt();
    assert_eq!(bands.middle[4], Some(3.0));
    assert_close(bands.upper[4].unwrap(), 3.0 + 2.0 * sd);
    assert_close(bands.lower[4].unwrap(), 3.0 - 2.0 * sd);
    assert!(bands.upper[3].is_none());
}

#[test]
fn test_bollinger_constant_series_collapses() {
    let bands = calculate_bollinger_bands(&[20.0; 30], 20, 2.0);
    assert_eq!(bands.upper[29], Some(20.0));
    assert_eq!(bands.lower[29], Some(20.0));
}

#[test]
fn test_atr_is_mean_true_range() {
    let candles = uptrend_candles(40, 1.0);
    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let atr = calculate_atr(&highs, &lows, &closes, 14);
    assert!(atr[12].is_none());
    assert_close(atr[13].unwrap(), 12.0);
    assert_close(atr[39].unwrap(), 12.0);
}

#[test]
fn test_atr_gap_uses_previous_close() {
    // Second bar gaps up: |high - prev close| = 10 beats high - low = 2.
    let atr = calculate_atr(&[11.0, 20.0], &[9.0, 18.0], &[10.0, 19.0], 2);
    assert_eq!(atr, vec![None, Some((2.0 + 10.0) / 2.0)]);
}

