//! Screening rule sets and their evaluation.

pub mod evaluator;
pub mod presets;

pub use evaluator::{ConditionEvaluator, Evaluation, RuleResult};
