//! Per-symbol screening jobs

pub mod context;
pub mod handlers;
pub mod types;

pub use context::JobContext;
pub use handlers::handle_symbol;
pub use types::{SymbolJob, SymbolOutcome};
