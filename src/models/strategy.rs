//! Rule-set data models for the screening conditions

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

/// Raw candle field a rule can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandleField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

fn unit_factor() -> f64 {
    1.0
}

fn is_unit_factor(factor: &f64) -> bool {
    *factor == 1.0
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Operand {
    /// Field of the latest candle, scaled by `factor`.
    Latest {
        field: CandleField,
        #[serde(default = "unit_factor", skip_serializing_if = "is_unit_factor")]
        factor: f64,
    },
    /// Field of the candle before the latest one.
    Previous {
        field: CandleField,
        #[serde(default = "unit_factor", skip_serializing_if = "is_unit_factor")]
        factor: f64,
    },
    /// Latest value of an indicator output key.
    Indicator {
        name: String,
        #[serde(default = "unit_factor", skip_serializing_if = "is_unit_factor")]
        factor: f64,
    },
    Constant { value: f64 },
}

impl Operand {
    pub fn latest(field: CandleField) -> Self {
        Operand::Latest { field, factor: 1.0 }
    }

    pub fn close() -> Self {
        Self::latest(CandleField::Close)
    }

    pub fn previous(field: CandleField) -> Self {
        Operand::Previous { field, factor: 1.0 }
    }

    pub fn indicator(name: impl Into<String>) -> Self {
        Operand::Indicator {
            name: name.into(),
            factor: 1.0,
        }
    }

    pub fn constant(value: f64) -> Self {
        Operand::Constant { value }
    }

    /// Scale this operand (e.g. `close * 1.05`). Constants are scaled in place.
    pub fn times(self, multiplier: f64) -> Self {
        match self {
            Operand::Latest { field, factor } => Operand::Latest {
                field,
                factor: factor * multiplier,
            },
            Operand::Previous { field, factor } => Operand::Previous {
                field,
                factor: factor * multiplier,
            },
            Operand::Indicator { name, factor } => Operand::Indicator {
                name,
                factor: factor * multiplier,
            },
            Operand::Constant { value } => Operand::Constant {
                value: value * multiplier,
            },
        }
    }

    pub fn indicator_name(&self) -> Option<&str> {
        match self {
            Operand::Indicator { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Comparison operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Comparison {
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    Equal,
    NotEqual,
}

/// Boolean condition over a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predicate {
    Compare {
        left: Operand,
        comparison: Comparison,
        right: Operand,
    },
    /// Strictly decreasing chain: `a > b > c > ...`.
    Descending { operands: Vec<Operand> },
    /// Every child holds.
    All { predicates: Vec<Predicate> },
}

impl Predicate {
    pub fn compare(left: Operand, comparison: Comparison, right: Operand) -> Self {
        Predicate::Compare {
            left,
            comparison,
            right,
        }
    }

    pub fn gt(left: Operand, right: Operand) -> Self {
        Self::compare(left, Comparison::GreaterThan, right)
    }

    pub fn ge(left: Operand, right: Operand) -> Self {
        Self::compare(left, Comparison::GreaterEqual, right)
    }

    pub fn lt(left: Operand, right: Operand) -> Self {
        Self::compare(left, Comparison::LessThan, right)
    }

    pub fn descending(operands: Vec<Operand>) -> Self {
        Predicate::Descending { operands }
    }

    pub fn all(predicates: Vec<Predicate>) -> Self {
        Predicate::All { predicates }
    }

    fn collect_dependencies<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Predicate::Compare { left, right, .. } => {
                out.extend(left.indicator_name());
                out.extend(right.indicator_name());
            }
            Predicate::Descending { operands } => {
                out.extend(operands.iter().filter_map(Operand::indicator_name));
            }
            Predicate::All { predicates } => {
                for predicate in predicates {
                    predicate.collect_dependencies(out);
                }
            }
        }
    }
}

/// A named screening condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub predicate: Predicate,
}

impl Rule {
    pub fn new(name: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }

    /// Indicator output keys this rule reads, in declaration order.
    pub fn dependencies(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.predicate.collect_dependencies(&mut out);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleSetError {
    #[error("rule set '{0}' has no rules")]
    Empty(String),
    #[error("rule name '{0}' is declared more than once")]
    DuplicateName(String),
    #[error("unknown rule '{0}'")]
    UnknownRule(String),
    #[error("minimum conditions {min} must be between 1 and {total}")]
    InvalidThreshold { min: usize, total: usize },
}

/// Ordered rules evaluated together. Order fixes reporting order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub name: String,
    /// Extra indicator requests in compact form (`name=kind:params`) that
    /// rules may reference beyond the standard catalogue.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indicators: Vec<String>,
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Result<Self, RuleSetError> {
        let set = Self {
            name: name.into(),
            indicators: Vec::new(),
            rules,
        };
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> Result<(), RuleSetError> {
        if self.rules.is_empty() {
            return Err(RuleSetError::Empty(self.name.clone()));
        }
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.name.as_str()) {
                return Err(RuleSetError::DuplicateName(rule.name.clone()));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Keep only the named rules, preserving declaration order.
    pub fn subset(&self, names: &[String]) -> Result<Self, RuleSetError> {
        for name in names {
            if !self.rules.iter().any(|r| &r.name == name) {
                return Err(RuleSetError::UnknownRule(name.clone()));
            }
        }
        let rules = self
            .rules
            .iter()
            .filter(|r| names.contains(&r.name))
            .cloned()
            .collect();
        let mut subset = Self::new(self.name.clone(), rules)?;
        subset.indicators = self.indicators.clone();
        Ok(subset)
    }

    /// All indicator output keys referenced by any rule.
    pub fn dependencies(&self) -> BTreeSet<String> {
        self.rules
            .iter()
            .flat_map(|rule| rule.dependencies())
            .map(str::to_string)
            .collect()
    }
}

/// How many conditions a symbol must meet to be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ThresholdMode {
    /// Every condition must hold.
    Strict,
    /// At least `min` conditions must hold.
    AtLeast { min: usize },
}

impl ThresholdMode {
    pub fn validate(&self, total: usize) -> Result<(), RuleSetError> {
        match *self {
            ThresholdMode::Strict => Ok(()),
            ThresholdMode::AtLeast { min } if min >= 1 && min <= total => Ok(()),
            ThresholdMode::AtLeast { min } => Err(RuleSetError::InvalidThreshold { min, total }),
        }
    }

    pub fn required(&self, total: usize) -> usize {
        match *self {
            ThresholdMode::Strict => total,
            ThresholdMode::AtLeast { min } => min,
        }
    }

    pub fn accepts(&self, conditions_met: usize, total: usize) -> bool {
        match *self {
            ThresholdMode::Strict => conditions_met == total,
            ThresholdMode::AtLeast { min } => conditions_met >= min,
        }
    }
}
