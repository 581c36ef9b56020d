//! Unit tests for scan plans and the per-symbol signal engine

use equiscan::indicators::registry::IndicatorRegistry;
use equiscan::models::result::SkipReason;
use equiscan::models::strategy::{Operand, Predicate, Rule, RuleSet, ThresholdMode};
use equiscan::signals::decision::TradeParams;
use equiscan::signals::engine::{PlanError, ScanPlan, SignalEngine};
use equiscan::signals::filter::EarlyFilter;
use equiscan::strategies::presets;

use crate::fixtures::{assert_close, constant, uptrend};

fn plan(rules: RuleSet, threshold: ThresholdMode) -> ScanPlan {
    ScanPlan::compile(
        rules,
        threshold,
        &IndicatorRegistry::standard(),
        200,
        EarlyFilter::default(),
        TradeParams::default(),
    )
    .unwrap()
}

#[test]
fn test_compile_rejects_out_of_range_threshold() {
    let err = ScanPlan::compile(
        presets::trend(),
        ThresholdMode::AtLeast { min: 11 },
        &IndicatorRegistry::standard(),
        200,
        EarlyFilter::default(),
        TradeParams::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PlanError::Rules(_)));
}

#[test]
fn test_compile_rejects_unknown_indicator() {
    let rules = RuleSet::new(
        "custom",
        vec![Rule::new(
            "above_ema7",
            Predicate::gt(Operand::close(), Operand::indicator("ema7")),
        )],
    )
    .unwrap();
    let err = ScanPlan::compile(
        rules,
        ThresholdMode::Strict,
        &IndicatorRegistry::standard(),
        200,
        EarlyFilter::default(),
        TradeParams::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PlanError::Indicator(_)));
}

#[test]
fn test_custom_indicator_raises_history_requirement() {
    let mut rules = RuleSet::new(
        "long",
        vec![Rule::new(
            "above_sma250",
            Predicate::gt(Operand::close(), Operand::indicator("sma250")),
        )],
    )
    .unwrap();
    rules.indicators.push("sma250=sma:250".to_string());

    let plan = plan(rules, ThresholdMode::Strict);
    assert_eq!(plan.min_history(), 250);
}

#[test]
fn test_prescreen_insufficient_history() {
    let plan = plan(presets::trend(), ThresholdMode::Strict);
    assert_eq!(
        SignalEngine::prescreen(&plan, &uptrend("SHORT", 50)),
        Err(SkipReason::InsufficientHistory)
    );
    assert_eq!(SignalEngine::prescreen(&plan, &uptrend("OK", 200)), Ok(()));
}

#[test]
fn test_prescreen_filtered_below_price_floor() {
    let plan = plan(presets::trend(), ThresholdMode::Strict);
    assert_eq!(
        SignalEngine::prescreen(&plan, &constant("PENNY", 250, 12.0)),
        Err(SkipReason::Filtered)
    );
}

#[test]
fn test_uptrend_meets_every_trend_condition() {
    let plan = plan(presets::trend(), ThresholdMode::Strict);
    let series = uptrend("RISING", 300);

    let analysis = SignalEngine::analyze(&plan, "NSE_EQ|RISING", &series).unwrap();
    assert!(analysis.evaluation.failed().is_empty(), "{:?}", analysis.evaluation.failed());

    let result = analysis.result.unwrap();
    assert_eq!(result.symbol, "RISING");
    assert_eq!(result.instrument_key, "NSE_EQ|RISING");
    assert_eq!(result.ratio_label(), "10/10");
    assert_close(result.entry_price, 399.0);
    assert_close(result.stop_loss, 399.0 * 0.95);
    assert_close(result.target, 435.0);
    assert!(!result.atr_is_proxy);
    assert_eq!(result.aux.rsi, Some(100.0));
    assert_close(result.aux.volume_ratio.unwrap(), 1.0);
    assert_close(result.aux.atr_pct.unwrap(), 12.0 / 399.0 * 100.0);
}

#[test]
fn test_flat_series_is_rejected_not_skipped() {
    let plan = plan(presets::trend(), ThresholdMode::Strict);
    let analysis = SignalEngine::analyze(&plan, "NSE_EQ|FLAT", &constant("FLAT", 300, 120.0)).unwrap();
    assert!(analysis.result.is_none());
    assert!(analysis.evaluation.conditions_met() < analysis.evaluation.total_conditions());
}

#[test]
fn test_threshold_mode_accepts_partial_match() {
    let series = constant("FLAT", 300, 120.0);
    let strict = plan(presets::trend(), ThresholdMode::Strict);
    let met = SignalEngine::analyze(&strict, "k", &series)
        .unwrap()
        .evaluation
        .conditions_met();
    assert!(met >= 1);

    let loose = plan(presets::trend(), ThresholdMode::AtLeast { min: met });
    let result = SignalEngine::analyze(&loose, "k", &series).unwrap().result.unwrap();
    assert_eq!(result.conditions_met, met);
    assert_eq!(result.total_conditions, 10);
}
