//! Job context for dependency injection

use std::sync::Arc;
use std::time::Duration;

use crate::metrics::Metrics;
use crate::services::market_data::MarketDataProvider;
use crate::signals::engine::ScanPlan;

/// Read-only state shared by every symbol pipeline of one scan.
pub struct JobContext {
    pub data_provider: Arc<dyn MarketDataProvider>,
    pub plan: Arc<ScanPlan>,
    pub lookback_days: u32,
    /// Upper bound on each market data fetch.
    pub fetch_timeout: Duration,
    pub metrics: Option<Arc<Metrics>>,
}

impl JobContext {
    pub fn new(
        data_provider: Arc<dyn MarketDataProvider>,
        plan: Arc<ScanPlan>,
        lookback_days: u32,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            data_provider,
            plan,
            lookback_days,
            fetch_timeout,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}
