//! Shared data models spanning the engine layers.

pub mod candle;
pub mod indicators;
pub mod result;
pub mod strategy;
pub mod symbol;

pub use candle::{Candle, Series, SeriesError};
pub use indicators::{IndicatorKind, IndicatorRequest, IndicatorSeries, IndicatorSet, Snapshot};
pub use result::{AuxMetrics, ScanSummary, ScreenResult, SkipReason};
pub use strategy::{
    CandleField, Comparison, Operand, Predicate, Rule, RuleSet, RuleSetError, ThresholdMode,
};
pub use symbol::SymbolEntry;
