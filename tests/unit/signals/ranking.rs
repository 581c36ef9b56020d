//! Unit tests for result ranking

use equiscan::models::result::{AuxMetrics, ScreenResult};
use equiscan::signals::ranking::{ResultRanker, TieBreak};

fn result(symbol: &str, conditions_met: usize, entry: f64) -> ScreenResult {
    ScreenResult {
        symbol: symbol.to_string(),
        instrument_key: format!("NSE_EQ|{}", symbol),
        conditions_met,
        total_conditions: 14,
        entry_price: entry,
        stop_loss: entry * 0.95,
        target: entry * 1.1,
        atr_is_proxy: false,
        aux: AuxMetrics::default(),
    }
}

fn symbols(results: &[ScreenResult]) -> Vec<&str> {
    results.iter().map(|r| r.symbol.as_str()).collect()
}

fn sample() -> Vec<ScreenResult> {
    vec![
        result("CCC", 12, 150.0),
        result("AAA", 14, 90.0),
        result("BBB", 12, 150.0),
        result("DDD", 12, 400.0),
        result("EEE", 13, 10.0),
    ]
}

#[test]
fn test_conditions_then_price_then_symbol() {
    let ranked = ResultRanker::default().rank(sample());
    assert_eq!(symbols(&ranked), vec!["AAA", "EEE", "DDD", "BBB", "CCC"]);
}

#[test]
fn test_symbol_tie_break() {
    let ranked = ResultRanker::new(TieBreak::Symbol).rank(sample());
    assert_eq!(symbols(&ranked), vec!["AAA", "EEE", "BBB", "CCC", "DDD"]);
}

#[test]
fn test_order_independent_of_input_order() {
    let ranker = ResultRanker::default();
    let forward = ranker.rank(sample());
    let mut reversed_input = sample();
    reversed_input.reverse();
    assert_eq!(ranker.rank(reversed_input), forward);
}

#[test]
fn test_tie_break_from_str() {
    assert_eq!("price".parse::<TieBreak>().unwrap(), TieBreak::Price);
    assert_eq!("Symbol".parse::<TieBreak>().unwrap(), TieBreak::Symbol);
    assert!("volume".parse::<TieBreak>().is_err());
}
