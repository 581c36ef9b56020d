use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of the scan universe: an opaque broker identifier plus the
/// display name used in results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub instrument_key: String,
    #[serde(rename = "tradingsymbol")]
    pub name: String,
}

impl SymbolEntry {
    pub fn new(instrument_key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            instrument_key: instrument_key.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for SymbolEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.instrument_key)
    }
}
