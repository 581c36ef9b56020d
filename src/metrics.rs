//! Prometheus metrics for scan runs

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::models::result::SkipReason;

pub struct Metrics {
    registry: Registry,
    pub symbols_scanned_total: IntCounter,
    pub symbols_skipped_total: IntCounterVec,
    pub symbols_matched_total: IntCounter,
    /// Incremented each time indicators are computed for a symbol.
    pub indicator_computations_total: IntCounter,
    pub fetch_failures_total: IntCounter,
    pub pipeline_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let symbols_scanned_total = IntCounter::new(
            "screener_symbols_scanned_total",
            "Symbols whose pipeline ran to an outcome",
        )?;
        let symbols_skipped_total = IntCounterVec::new(
            Opts::new(
                "screener_symbols_skipped_total",
                "Symbols excluded before evaluation, by reason",
            ),
            &["reason"],
        )?;
        let symbols_matched_total = IntCounter::new(
            "screener_symbols_matched_total",
            "Symbols meeting the condition threshold",
        )?;
        let indicator_computations_total = IntCounter::new(
            "screener_indicator_computations_total",
            "Indicator set computations",
        )?;
        let fetch_failures_total = IntCounter::new(
            "screener_fetch_failures_total",
            "Market data fetches that failed or timed out",
        )?;
        let pipeline_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "screener_pipeline_duration_seconds",
                "Per-symbol pipeline duration",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        )?;

        registry.register(Box::new(symbols_scanned_total.clone()))?;
        registry.register(Box::new(symbols_skipped_total.clone()))?;
        registry.register(Box::new(symbols_matched_total.clone()))?;
        registry.register(Box::new(indicator_computations_total.clone()))?;
        registry.register(Box::new(fetch_failures_total.clone()))?;
        registry.register(Box::new(pipeline_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            symbols_scanned_total,
            symbols_skipped_total,
            symbols_matched_total,
            indicator_computations_total,
            fetch_failures_total,
            pipeline_duration_seconds,
        })
    }

    pub fn record_skip(&self, reason: SkipReason) {
        self.symbols_skipped_total
            .with_label_values(&[reason.as_str()])
            .inc();
    }

    pub fn skipped(&self, reason: SkipReason) -> u64 {
        self.symbols_skipped_total
            .with_label_values(&[reason.as_str()])
            .get()
    }

    /// Text exposition format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
