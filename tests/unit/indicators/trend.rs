//! Unit tests for EMA, SMA and ADX/DMI

use equiscan::indicators::trend::{calculate_dmi, calculate_ema, calculate_sma};

use crate::fixtures::uptrend_candles;

#[test]
fn test_ema_insufficient_data() {
    let ema = calculate_ema(&[100.0; 10], 20);
    assert_eq!(ema.len(), 10);
    assert!(ema.iter().all(Option::is_none));
}

#[test]
fn test_ema_converges_on_constant_series() {
    for span in [5, 13, 26, 50] {
        let ema = calculate_ema(&[250.0; 120], span);
        assert_eq!(ema[span - 1], Some(250.0));
        assert_eq!(ema[119], Some(250.0));
    }
}

#[test]
fn test_ema_lags_an_uptrend() {
    let closes: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
    let fast = calculate_ema(&closes, 5)[99].unwrap();
    let slow = calculate_ema(&closes, 26)[99].unwrap();
    assert!(closes[99] > fast && fast > slow);
}

#[test]
fn test_sma_warmup() {
    let sma = calculate_sma(&[1.0, 2.0, 3.0, 4.0], 4);
    assert_eq!(sma, vec![None, None, None, Some(2.5)]);
}

#[test]
fn test_dmi_uptrend_is_all_positive_movement() {
    let candles = uptrend_candles(60, 1.0);
    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let period = 14;

    let dmi = calculate_dmi(&highs, &lows, &closes, period);

    assert!(dmi.plus_di[period - 1].is_none());
    assert!(dmi.plus_di[period].is_some());
    assert!(dmi.adx[2 * period - 2].is_none());
    assert!(dmi.adx[2 * period - 1].is_some());

    let plus = dmi.plus_di[59].unwrap();
    let minus = dmi.minus_di[59].unwrap();
    assert!(plus > 0.0);
    assert_eq!(minus, 0.0);
    assert!((dmi.adx[59].unwrap() - 100.0).abs() < 1e-9);
}

#[test]
fn test_dmi_insufficient_data() {
    let dmi = calculate_dmi(&[1.0; 10], &[1.0; 10], &[1.0; 10], 14);
    assert!(dmi.adx.iter().all(Option::is_none));
    assert!(dmi.plus_di.iter().all(Option::is_none));
    assert_eq!(dmi.minus_di.len(), 10);
}
