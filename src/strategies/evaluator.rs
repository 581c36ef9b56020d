//! Rule-set evaluation against a per-symbol snapshot

use serde::Serialize;

use crate::models::candle::Candle;
use crate::models::indicators::Snapshot;
use crate::models::strategy::{CandleField, Comparison, Operand, Predicate, RuleSet, ThresholdMode};

const EQUALITY_TOLERANCE: f64 = 0.0001;

/// Outcome of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleResult {
    pub rule: String,
    pub passed: bool,
}

/// Per-rule outcomes in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub results: Vec<RuleResult>,
}

impl Evaluation {
    pub fn conditions_met(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn total_conditions(&self) -> usize {
        self.results.len()
    }

    /// Pass/fail vector in rule order.
    pub fn flags(&self) -> Vec<bool> {
        self.results.iter().map(|r| r.passed).collect()
    }

    /// Names of failing rules, in rule order.
    pub fn failed(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.rule.as_str())
            .collect()
    }

    pub fn is_accepted(&self, mode: ThresholdMode) -> bool {
        mode.accepts(self.conditions_met(), self.total_conditions())
    }
}

pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Evaluate every rule in order. Never fails: a rule reading an
    /// undefined value simply does not pass.
    pub fn evaluate(snapshot: &Snapshot, rules: &RuleSet) -> Evaluation {
        let results = rules
            .rules
            .iter()
            .map(|rule| RuleResult {
                rule: rule.name.clone(),
                passed: Self::evaluate_predicate(&rule.predicate, snapshot),
            })
            .collect();
        Evaluation { results }
    }

    pub fn evaluate_predicate(predicate: &Predicate, snapshot: &Snapshot) -> bool {
        match predicate {
            Predicate::Compare {
                left,
                comparison,
                right,
            } => match (Self::resolve(left, snapshot), Self::resolve(right, snapshot)) {
                (Some(l), Some(r)) => Self::compare_value(l, *comparison, r),
                _ => false,
            },
            Predicate::Descending { operands } => {
                if operands.len() < 2 {
                    return false;
                }
                let values: Option<Vec<f64>> = operands
                    .iter()
                    .map(|operand| Self::resolve(operand, snapshot))
                    .collect();
                match values {
                    Some(values) => values.windows(2).all(|pair| pair[0] > pair[1]),
                    None => false,
                }
            }
            Predicate::All { predicates } => {
                !predicates.is_empty()
                    && predicates
                        .iter()
                        .all(|child| Self::evaluate_predicate(child, snapshot))
            }
        }
    }

    /// Numeric value of an operand; `None` when undefined or non-finite.
    pub fn resolve(operand: &Operand, snapshot: &Snapshot) -> Option<f64> {
        let value = match operand {
            Operand::Latest { field, factor } => candle_field(&snapshot.latest, *field) * factor,
            Operand::Previous { field, factor } => {
                candle_field(snapshot.previous.as_ref()?, *field) * factor
            }
            Operand::Indicator { name, factor } => snapshot.value(name)? * factor,
            Operand::Constant { value } => *value,
        };
        value.is_finite().then_some(value)
    }

    /// Compare a value using the specified comparison operator
    fn compare_value(value: f64, comparison: Comparison, threshold: f64) -> bool {
        match comparison {
            Comparison::GreaterThan => value > threshold,
            Comparison::LessThan => value < threshold,
            Comparison::GreaterEqual => value >= threshold,
            Comparison::LessEqual => value <= threshold,
            Comparison::Equal => (value - threshold).abs() < EQUALITY_TOLERANCE,
            Comparison::NotEqual => (value - threshold).abs() >= EQUALITY_TOLERANCE,
        }
    }
}

fn candle_field(candle: &Candle, field: CandleField) -> f64 {
    match field {
        CandleField::Open => candle.open,
        CandleField::High => candle.high,
        CandleField::Low => candle.low,
        CandleField::Close => candle.close,
        CandleField::Volume => candle.volume,
    }
}
