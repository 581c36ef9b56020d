//! Price structure: recent highs

pub mod support_resistance;

pub use support_resistance::*;
