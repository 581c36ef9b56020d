//! Market data provider interface.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::candle::Series;
use crate::models::result::SkipReason;
use crate::models::symbol::SymbolEntry;

/// Non-fatal fetch failure; the symbol is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}: {detail}")]
pub struct DataUnavailable {
    pub reason: SkipReason,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("data unavailable ({0})")]
    Unavailable(#[from] DataUnavailable),
    /// Expired or invalid credentials. Fatal for the whole scan.
    #[error("authentication failed: {0}")]
    Auth(String),
}

impl DataError {
    pub fn unavailable(reason: SkipReason, detail: impl Into<String>) -> Self {
        DataError::Unavailable(DataUnavailable {
            reason,
            detail: detail.into(),
        })
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, DataError::Auth(_))
    }

    /// Skip category for non-fatal errors.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            DataError::Unavailable(e) => Some(e.reason),
            DataError::Auth(_) => None,
        }
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily candles covering the last `lookback_days` calendar days,
    /// oldest first.
    async fn get_candles(
        &self,
        symbol: &SymbolEntry,
        lookback_days: u32,
    ) -> Result<Series, DataError>;

    /// Cheap credential check run before a scan.
    async fn check_connection(&self) -> Result<(), DataError> {
        Ok(())
    }
}

