//! Shared numeric helpers used by the indicator formulas.

pub mod math;
