//! Per-symbol screening: filter, evaluation, trade levels and ranking.

pub mod decision;
pub mod engine;
pub mod filter;
pub mod ranking;

pub use decision::*;
pub use engine::{Analysis, PlanError, ScanPlan, SignalEngine};
pub use filter::*;
pub use ranking::*;
