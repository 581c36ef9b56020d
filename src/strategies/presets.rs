//! Built-in rule sets.
//!
//! Indicator keys refer to the standard catalogue in
//! `indicators::registry::IndicatorRegistry::standard`.

use crate::models::strategy::{CandleField, Operand, Predicate, Rule, RuleSet};

pub const PRESET_NAMES: [&str; 3] = ["elite", "advanced", "trend"];

fn ind(name: &str) -> Operand {
    Operand::indicator(name)
}

fn close() -> Operand {
    Operand::close()
}

fn volume() -> Operand {
    Operand::latest(CandleField::Volume)
}

fn preset(name: &str, rules: Vec<Rule>) -> RuleSet {
    RuleSet {
        name: name.to_string(),
        indicators: Vec::new(),
        rules,
    }
}

fn bullish_candle() -> Rule {
    Rule::new(
        "bullish_candle",
        Predicate::gt(close(), Operand::latest(CandleField::Open)),
    )
}

fn volume_above_average() -> Predicate {
    Predicate::gt(volume(), ind("vol_sma50"))
}

fn volume_above_floor() -> Predicate {
    Predicate::gt(volume(), Operand::constant(100_000.0))
}

fn dmi_bullish() -> Predicate {
    Predicate::ge(ind("dmi_plus_di"), ind("dmi_minus_di"))
}

/// 14 momentum-breakout conditions, usually run with a minimum-count threshold.
pub fn elite() -> RuleSet {
    preset(
        "elite",
        vec![
            Rule::new(
                "close_above_ema_stack",
                Predicate::descending(vec![close(), ind("ema5"), ind("ema13"), ind("ema26")]),
            ),
            Rule::new(
                "close_above_sma_stack",
                Predicate::descending(vec![close(), ind("sma50"), ind("sma100"), ind("sma200")]),
            ),
            Rule::new("rsi_above_55", Predicate::gt(ind("rsi14"), Operand::constant(55.0))),
            Rule::new(
                "stoch_rsi_above_50",
                Predicate::gt(ind("stoch_rsi14"), Operand::constant(50.0)),
            ),
            Rule::new(
                "macd_above_signal",
                Predicate::gt(ind("macd_line"), ind("macd_signal")),
            ),
            Rule::new(
                "adx_trending_bullish",
                Predicate::all(vec![
                    Predicate::gt(ind("dmi_adx"), Operand::constant(20.0)),
                    dmi_bullish(),
                ]),
            ),
            Rule::new(
                "volume_surge",
                Predicate::all(vec![volume_above_floor(), volume_above_average()]),
            ),
            bullish_candle(),
            Rule::new("close_at_upper_band", Predicate::ge(close(), ind("bb_upper"))),
            Rule::new(
                "near_200_day_high",
                Predicate::gt(close().times(1.05), ind("high200")),
            ),
            Rule::new(
                "gap_up",
                Predicate::gt(
                    Operand::latest(CandleField::Low),
                    Operand::previous(CandleField::High),
                ),
            ),
            Rule::new(
                "close_near_day_high",
                Predicate::ge(close(), Operand::latest(CandleField::High).times(0.97)),
            ),
            Rule::new(
                "close_near_window_high",
                Predicate::ge(close(), ind("high300").times(0.95)),
            ),
            Rule::new(
                "atr_below_6_pct",
                Predicate::lt(ind("atr14"), close().times(0.06)),
            ),
        ],
    )
}

/// 16 trend-confirmation conditions, normally all required.
pub fn advanced() -> RuleSet {
    let above_sma20 = |name: &str| {
        Rule::new(
            format!("{}_above_sma20", name),
            Predicate::gt(ind(name), ind("sma20")),
        )
    };

    preset(
        "advanced",
        vec![
            above_sma20("ema5"),
            above_sma20("ema13"),
            above_sma20("ema26"),
            above_sma20("sma50"),
            above_sma20("sma100"),
            above_sma20("sma200"),
            Rule::new("plus_di_over_minus_di", dmi_bullish()),
            Rule::new(
                "macd_over_signal",
                Predicate::ge(ind("macd_line"), ind("macd_signal")),
            ),
            Rule::new("rsi_above_40", Predicate::gt(ind("rsi14"), Operand::constant(40.0))),
            Rule::new(
                "stoch_rsi_above_30",
                Predicate::gt(ind("stoch_rsi14"), Operand::constant(30.0)),
            ),
            Rule::new("close_at_upper_band", Predicate::ge(close(), ind("bb_upper"))),
            bullish_candle(),
            Rule::new("volume_above_100k", volume_above_floor()),
            Rule::new(
                "near_300_day_high",
                Predicate::gt(close().times(1.05), ind("high300")),
            ),
            Rule::new(
                "close_above_previous",
                Predicate::gt(close(), Operand::previous(CandleField::Close)),
            ),
            Rule::new("volume_above_average", volume_above_average()),
        ],
    )
}

/// Moving-average and oscillator alignment that a steady uptrend satisfies.
pub fn trend() -> RuleSet {
    preset(
        "trend",
        vec![
            Rule::new(
                "ema_stack",
                Predicate::descending(vec![ind("ema5"), ind("ema13"), ind("ema26")]),
            ),
            Rule::new("close_above_sma20", Predicate::gt(close(), ind("sma20"))),
            Rule::new(
                "sma_stack",
                Predicate::descending(vec![
                    ind("sma20"),
                    ind("sma50"),
                    ind("sma100"),
                    ind("sma200"),
                ]),
            ),
            Rule::new(
                "macd_over_signal",
                Predicate::ge(ind("macd_line"), ind("macd_signal")),
            ),
            Rule::new("rsi_above_50", Predicate::gt(ind("rsi14"), Operand::constant(50.0))),
            Rule::new("plus_di_over_minus_di", dmi_bullish()),
            Rule::new(
                "close_above_previous",
                Predicate::gt(close(), Operand::previous(CandleField::Close)),
            ),
            bullish_candle(),
            Rule::new(
                "volume_at_or_above_average",
                Predicate::ge(volume(), ind("vol_sma50")),
            ),
            Rule::new(
                "near_300_day_high",
                Predicate::gt(close().times(1.05), ind("high300")),
            ),
        ],
    )
}

/// Look up a preset by name, ignoring case.
pub fn by_name(name: &str) -> Option<RuleSet> {
    match name.trim().to_ascii_lowercase().as_str() {
        "elite" => Some(elite()),
        "advanced" => Some(advanced()),
        "trend" => Some(trend()),
        _ => None,
    }
}
