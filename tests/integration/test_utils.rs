//! Shared helpers: scripted market data provider and candle fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use equiscan::core::runtime::ScreenerRuntime;
use equiscan::indicators::registry::IndicatorRegistry;
use equiscan::jobs::context::JobContext;
use equiscan::metrics::Metrics;
use equiscan::models::candle::{Candle, Series};
use equiscan::models::result::SkipReason;
use equiscan::models::strategy::{RuleSet, ThresholdMode};
use equiscan::models::symbol::SymbolEntry;
use equiscan::services::market_data::{DataError, MarketDataProvider};
use equiscan::signals::decision::TradeParams;
use equiscan::signals::engine::ScanPlan;
use equiscan::signals::filter::EarlyFilter;

/// In-memory provider with per-symbol scripted responses.
///
/// Unscripted symbols answer with an empty-data error. Every call is
/// counted and recorded in call order.
#[derive(Default)]
pub struct MockMarketDataProvider {
    responses: HashMap<String, Result<Series, DataError>>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MockMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, symbol: &SymbolEntry, series: Series) -> Self {
        self.responses
            .insert(symbol.instrument_key.clone(), Ok(series));
        self
    }

    pub fn with_error(mut self, symbol: &SymbolEntry, error: DataError) -> Self {
        self.responses
            .insert(symbol.instrument_key.clone(), Err(error));
        self
    }

    pub fn with_delay(mut self, symbol: &SymbolEntry, delay: Duration) -> Self {
        self.delays.insert(symbol.instrument_key.clone(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketDataProvider {
    async fn get_candles(
        &self,
        symbol: &SymbolEntry,
        _lookback_days: u32,
    ) -> Result<Series, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested
            .lock()
            .unwrap()
            .push(symbol.instrument_key.clone());

        if let Some(delay) = self.delays.get(&symbol.instrument_key) {
            tokio::time::sleep(*delay).await;
        }

        self.responses
            .get(&symbol.instrument_key)
            .cloned()
            .unwrap_or_else(|| Err(DataError::unavailable(SkipReason::Empty, "not scripted")))
    }
}

pub fn symbol(name: &str) -> SymbolEntry {
    SymbolEntry::new(format!("NSE_EQ|{}", name), name)
}

pub fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + ChronoDuration::days(i as i64)
}

/// close = base + i, open half a point lower, a 12-point range.
pub fn uptrend_series(name: &str, days: usize, base: f64, volume: f64) -> Series {
    let candles = (0..days)
        .map(|i| {
            let close = base + i as f64;
            Candle::new(close - 0.5, close + 6.0, close - 6.0, close, volume, day(i))
        })
        .collect();
    Series::new(name, candles).unwrap()
}

/// The reference uptrend: 300 days from 100, volume 200,000.
pub fn uptrend(name: &str) -> Series {
    uptrend_series(name, 300, 100.0, 200_000.0)
}

pub fn flat_series(name: &str, days: usize, price: f64) -> Series {
    let candles = (0..days)
        .map(|i| Candle::new(price, price, price, price, 200_000.0, day(i)))
        .collect();
    Series::new(name, candles).unwrap()
}

pub fn compile_plan(rules: RuleSet, threshold: ThresholdMode) -> ScanPlan {
    ScanPlan::compile(
        rules,
        threshold,
        &IndicatorRegistry::standard(),
        200,
        EarlyFilter::default(),
        TradeParams::default(),
    )
    .unwrap()
}

pub fn runtime(
    provider: Arc<MockMarketDataProvider>,
    plan: ScanPlan,
    concurrency: usize,
    fetch_timeout: Duration,
    metrics: Arc<Metrics>,
) -> ScreenerRuntime {
    let context = JobContext::new(provider, Arc::new(plan), 400, fetch_timeout)
        .with_metrics(metrics);
    ScreenerRuntime::new(Arc::new(context)).with_concurrency(concurrency)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
