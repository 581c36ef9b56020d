//! Scan orchestration

pub mod runtime;

pub use runtime::{ScanError, ScanProgress, ScanReport, ScreenerRuntime};
