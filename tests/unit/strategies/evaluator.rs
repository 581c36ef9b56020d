//! Unit tests for rule evaluation

use equiscan::models::candle::Candle;
use equiscan::models::indicators::Snapshot;
use equiscan::models::strategy::{
    CandleField, Comparison, Operand, Predicate, Rule, RuleSet, ThresholdMode,
};
use equiscan::strategies::evaluator::ConditionEvaluator;

use crate::fixtures::day;

fn snapshot() -> Snapshot {
    let previous = Candle::new(98.0, 101.0, 97.0, 100.0, 90_000.0, day(0));
    let latest = Candle::new(101.0, 106.0, 100.5, 105.0, 150_000.0, day(1));
    Snapshot::from_candles("TEST", latest, Some(previous))
        .with_value("ema5", Some(104.0))
        .with_value("ema13", Some(102.0))
        .with_value("ema26", Some(99.0))
        .with_value("rsi14", Some(61.0))
        .with_value("sma200", None)
        .with_value("broken", Some(f64::NAN))
}

fn ind(name: &str) -> Operand {
    Operand::indicator(name)
}

fn rules(rules: Vec<Rule>) -> RuleSet {
    RuleSet::new("test", rules).unwrap()
}

#[test]
fn test_undefined_indicator_fails_the_rule() {
    let snap = snapshot();
    for name in ["sma200", "missing", "broken"] {
        let predicate = Predicate::gt(Operand::close(), ind(name));
        assert!(!ConditionEvaluator::evaluate_predicate(&predicate, &snap));
        let inverse = Predicate::lt(Operand::close(), ind(name));
        assert!(!ConditionEvaluator::evaluate_predicate(&inverse, &snap));
    }
}

#[test]
fn test_descending_chain() {
    let snap = snapshot();
    let stack = Predicate::descending(vec![Operand::close(), ind("ema5"), ind("ema13"), ind("ema26")]);
    assert!(ConditionEvaluator::evaluate_predicate(&stack, &snap));

    let broken = Predicate::descending(vec![ind("ema13"), ind("ema5")]);
    assert!(!ConditionEvaluator::evaluate_predicate(&broken, &snap));

    let single = Predicate::descending(vec![ind("ema5")]);
    assert!(!ConditionEvaluator::evaluate_predicate(&single, &snap));
}

#[test]
fn test_scaled_operands_and_previous_candle() {
    let snap = snapshot();
    // 100.5 > 101 * 0.99
    let gap = Predicate::gt(
        Operand::latest(CandleField::Low),
        Operand::previous(CandleField::High).times(0.99),
    );
    assert!(ConditionEvaluator::evaluate_predicate(&gap, &snap));
    assert_eq!(
        ConditionEvaluator::resolve(&Operand::close().times(1.05), &snap),
        Some(105.0 * 1.05)
    );
}

#[test]
fn test_equality_tolerance() {
    let snap = snapshot();
    let near = Predicate::compare(ind("rsi14"), Comparison::Equal, Operand::constant(61.00005));
    assert!(ConditionEvaluator::evaluate_predicate(&near, &snap));
    let far = Predicate::compare(ind("rsi14"), Comparison::NotEqual, Operand::constant(61.1));
    assert!(ConditionEvaluator::evaluate_predicate(&far, &snap));
}

#[test]
fn test_all_predicate() {
    let snap = snapshot();
    let both = Predicate::all(vec![
        Predicate::gt(ind("rsi14"), Operand::constant(55.0)),
        Predicate::gt(Operand::close(), ind("ema5")),
    ]);
    assert!(ConditionEvaluator::evaluate_predicate(&both, &snap));
    assert!(!ConditionEvaluator::evaluate_predicate(&Predicate::all(Vec::new()), &snap));
}

#[test]
fn test_evaluation_preserves_rule_order() {
    let snap = snapshot();
    let set = rules(vec![
        Rule::new("rsi_above_70", Predicate::gt(ind("rsi14"), Operand::constant(70.0))),
        Rule::new("close_above_ema5", Predicate::gt(Operand::close(), ind("ema5"))),
        Rule::new("above_sma200", Predicate::gt(Operand::close(), ind("sma200"))),
        Rule::new(
            "bullish",
            Predicate::gt(Operand::close(), Operand::latest(CandleField::Open)),
        ),
    ]);

    let evaluation = ConditionEvaluator::evaluate(&snap, &set);
    assert_eq!(evaluation.flags(), vec![false, true, false, true]);
    assert_eq!(evaluation.conditions_met(), 2);
    assert_eq!(evaluation.total_conditions(), 4);
    assert_eq!(evaluation.failed(), vec!["rsi_above_70", "above_sma200"]);
}

#[test]
fn test_strict_and_threshold_modes() {
    let snap = snapshot();
    let set = rules(vec![
        Rule::new("a", Predicate::gt(Operand::close(), ind("ema5"))),
        Rule::new("b", Predicate::gt(ind("rsi14"), Operand::constant(50.0))),
        Rule::new("c", Predicate::gt(ind("rsi14"), Operand::constant(90.0))),
    ]);
    let evaluation = ConditionEvaluator::evaluate(&snap, &set);

    assert!(evaluation.conditions_met() <= evaluation.total_conditions());
    assert!(!evaluation.is_accepted(ThresholdMode::Strict));
    assert!(evaluation.is_accepted(ThresholdMode::AtLeast { min: 2 }));
    assert!(!evaluation.is_accepted(ThresholdMode::AtLeast { min: 3 }));
}

#[test]
fn test_threshold_validation() {
    assert!(ThresholdMode::AtLeast { min: 0 }.validate(5).is_err());
    assert!(ThresholdMode::AtLeast { min: 6 }.validate(5).is_err());
    assert!(ThresholdMode::AtLeast { min: 5 }.validate(5).is_ok());
    assert_eq!(ThresholdMode::Strict.required(7), 7);
}

#[test]
fn test_rule_set_rejects_duplicates_and_empty() {
    let rule = || Rule::new("dup", Predicate::gt(Operand::close(), Operand::constant(1.0)));
    assert!(RuleSet::new("x", vec![rule(), rule()]).is_err());
    assert!(RuleSet::new("x", Vec::new()).is_err());
}

#[test]
fn test_rule_set_json_round_trip_keeps_dependencies() {
    let set = rules(vec![Rule::new(
        "stack",
        Predicate::descending(vec![Operand::close(), ind("ema5"), ind("sma20")]),
    )]);
    let json = serde_json::to_string(&set).unwrap();
    let parsed: RuleSet = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, set);
    assert_eq!(
        parsed.dependencies().into_iter().collect::<Vec<_>>(),
        vec!["ema5".to_string(), "sma20".to_string()]
    );
}
