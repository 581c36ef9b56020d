//! Upstox daily-candle market data provider

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use std::time::Duration;
use tracing::{debug, info};

use crate::models::candle::Series;
use crate::models::result::SkipReason;
use crate::models::symbol::SymbolEntry;
use crate::services::market_data::{DataError, MarketDataProvider};

use super::client::{ClientError, UpstoxClient};
use super::messages::parse_candle_row;

pub struct UpstoxMarketDataProvider {
    client: UpstoxClient,
    /// Fixed "today" for reproducible date ranges; `None` uses the clock.
    today: Option<NaiveDate>,
}

impl UpstoxMarketDataProvider {
    pub fn new(
        base_url: &str,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            client: UpstoxClient::new(base_url, access_token, timeout)?,
            today: None,
        })
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn date_range(&self, lookback_days: u32) -> (NaiveDate, NaiveDate) {
        let to = self.today.unwrap_or_else(|| Utc::now().date_naive());
        let from = to - ChronoDuration::days(i64::from(lookback_days));
        (to, from)
    }
}

#[async_trait]
impl MarketDataProvider for UpstoxMarketDataProvider {
    async fn get_candles(
        &self,
        symbol: &SymbolEntry,
        lookback_days: u32,
    ) -> Result<Series, DataError> {
        let (to, from) = self.date_range(lookback_days);
        let response = self
            .client
            .historical_candles(&symbol.instrument_key, to, from)
            .await?;

        if response.status != "success" {
            return Err(DataError::unavailable(
                SkipReason::Malformed,
                format!("status '{}'", response.status),
            ));
        }

        let rows = response.data.map(|d| d.candles).unwrap_or_default();
        if rows.is_empty() {
            return Err(DataError::unavailable(SkipReason::Empty, "no candles returned"));
        }

        let candles = rows
            .iter()
            .map(|row| parse_candle_row(row))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DataError::unavailable(SkipReason::Malformed, e))?;

        // Upstox returns newest first.
        let series = Series::from_unsorted(symbol.name.clone(), candles)
            .map_err(|e| DataError::unavailable(SkipReason::Malformed, e.to_string()))?;

        debug!(symbol = %symbol.name, candles = series.len(), "Fetched candles");
        Ok(series)
    }

    async fn check_connection(&self) -> Result<(), DataError> {
        let profile = self.client.profile().await?;
        if profile.status != "success" {
            return Err(DataError::unavailable(
                SkipReason::Malformed,
                format!("profile status '{}'", profile.status),
            ));
        }
        let data = profile.data.unwrap_or_default();
        info!(
            user_id = data.user_id.as_deref().unwrap_or("N/A"),
            user_name = data.user_name.as_deref().unwrap_or("User"),
            "Upstox connection verified"
        );
        Ok(())
    }
}
