//! Short-lived in-memory cache of fetched series

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::trace;

use crate::models::candle::Series;
use crate::models::symbol::SymbolEntry;
use crate::services::market_data::{DataError, MarketDataProvider};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

type CacheKey = (String, u32);

/// Wraps a provider and reuses successful fetches for `ttl`.
/// Failures are never cached. A zero TTL disables caching.
pub struct CachedProvider<P> {
    inner: P,
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, (Instant, Series)>>,
}

impl<P: MarketDataProvider> CachedProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl<P: MarketDataProvider> MarketDataProvider for CachedProvider<P> {
    async fn get_candles(
        &self,
        symbol: &SymbolEntry,
        lookback_days: u32,
    ) -> Result<Series, DataError> {
        if self.ttl.is_zero() {
            return self.inner.get_candles(symbol, lookback_days).await;
        }

        let key = (symbol.instrument_key.clone(), lookback_days);
        if let Some((stored, series)) = self.entries.read().await.get(&key) {
            if stored.elapsed() < self.ttl {
                trace!(symbol = %symbol.name, "Cache hit");
                return Ok(series.clone());
            }
        }

        let series = self.inner.get_candles(symbol, lookback_days).await?;
        self.entries
            .write()
            .await
            .insert(key, (Instant::now(), series.clone()));
        Ok(series)
    }

    async fn check_connection(&self) -> Result<(), DataError> {
        self.inner.check_connection().await
    }
}
