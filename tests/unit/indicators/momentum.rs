//! Unit tests for RSI, Stochastic RSI and MACD

use equiscan::indicators::momentum::{calculate_macd, calculate_rsi, calculate_stoch_rsi};

use crate::fixtures::wave_closes;

#[test]
fn test_rsi_no_losses_is_100() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
    let rsi = calculate_rsi(&closes, 14);
    assert!(rsi[13].is_none());
    assert_eq!(rsi[14], Some(100.0));
    assert_eq!(rsi[29], Some(100.0));
}

#[test]
fn test_rsi_flat_series_is_100() {
    let rsi = calculate_rsi(&[50.0; 20], 14);
    assert_eq!(rsi[19], Some(100.0));
}

#[test]
fn test_rsi_no_gains_is_0() {
    let closes: Vec<f64> = (0..30).map(|i| 200.0 - i as f64).collect();
    assert_eq!(calculate_rsi(&closes, 14)[29], Some(0.0));
}

#[test]
fn test_rsi_bounds() {
    let rsi = calculate_rsi(&wave_closes(200), 14);
    let defined: Vec<f64> = rsi.iter().flatten().copied().collect();
    assert_eq!(defined.len(), 200 - 14);
    assert!(defined.iter().all(|v| (0.0..=100.0).contains(v)));
}

#[test]
fn test_rsi_simple_average_window() {
    // Window of changes: +2, -1 -> avg gain 1, avg loss 0.5 -> RS 2.
    let rsi = calculate_rsi(&[10.0, 12.0, 11.0], 2);
    assert!((rsi[2].unwrap() - 100.0 * 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_stoch_rsi_undefined_when_range_is_zero() {
    let stoch = calculate_stoch_rsi(&[75.0; 60], 14);
    assert!(stoch.iter().all(Option::is_none));
}

#[test]
fn test_stoch_rsi_bounds_and_warmup() {
    let period = 14;
    let stoch = calculate_stoch_rsi(&wave_closes(200), period);
    assert!(stoch[2 * period - 2].is_none());
    assert!(stoch[2 * period - 1].is_some());
    assert!(stoch
        .iter()
        .flatten()
        .all(|v| v.is_finite() && (0.0..=100.0).contains(v)));
}

#[test]
fn test_macd_constant_series_is_zero() {
    let macd = calculate_macd(&[80.0; 60], 12, 26, 9);
    assert_eq!(macd.line[25], Some(0.0));
    assert_eq!(macd.signal[59], Some(0.0));
    assert_eq!(macd.histogram[59], Some(0.0));
}

#[test]
fn test_macd_warmup_lengths() {
    let macd = calculate_macd(&wave_closes(100), 12, 26, 9);
    assert!(macd.line[24].is_none());
    assert!(macd.line[25].is_some());
    assert!(macd.signal[32].is_none());
    assert!(macd.signal[33].is_some());
    assert_eq!(macd.histogram.len(), 100);
}

#[test]
fn test_macd_uptrend_line_above_zero() {
    let closes: Vec<f64> = (0..120).map(|i| 100.0 + i as f64).collect();
    let macd = calculate_macd(&closes, 12, 26, 9);
    let line = macd.line[119].unwrap();
    let signal = macd.signal[119].unwrap();
    assert!(line > 0.0);
    assert!(line >= signal);
}

