//! Per-symbol pipeline handler: fetch, prescreen, analyze

use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::jobs::context::JobContext;
use crate::jobs::types::{SymbolJob, SymbolOutcome};
use crate::models::result::SkipReason;
use crate::services::market_data::DataError;
use crate::signals::engine::SignalEngine;

/// Run one symbol to a terminal outcome. Never returns an error: every
/// failure is folded into the outcome.
pub async fn handle_symbol(job: &SymbolJob, ctx: &JobContext) -> SymbolOutcome {
    let start = Instant::now();
    let outcome = run_pipeline(job, ctx).await;

    if let Some(ref metrics) = ctx.metrics {
        metrics
            .pipeline_duration_seconds
            .observe(start.elapsed().as_secs_f64());
    }
    outcome
}

async fn run_pipeline(job: &SymbolJob, ctx: &JobContext) -> SymbolOutcome {
    let symbol = &job.symbol;
    let fetch = ctx.data_provider.get_candles(symbol, ctx.lookback_days);

    let series = match timeout(ctx.fetch_timeout, fetch).await {
        Ok(Ok(series)) => series,
        Ok(Err(DataError::Auth(message))) => {
            warn!(symbol = %symbol.name, error = %message, "Authentication failed during fetch");
            return SymbolOutcome::Aborted(message);
        }
        Ok(Err(DataError::Unavailable(e))) => {
            debug!(symbol = %symbol.name, reason = %e.reason, detail = %e.detail, "Data unavailable");
            record_fetch_failure(ctx);
            return SymbolOutcome::Skipped(e.reason);
        }
        Err(_) => {
            debug!(
                symbol = %symbol.name,
                timeout_ms = ctx.fetch_timeout.as_millis() as u64,
                "Fetch timed out"
            );
            record_fetch_failure(ctx);
            return SymbolOutcome::Skipped(SkipReason::Timeout);
        }
    };

    let plan = ctx.plan.as_ref();
    if let Err(reason) = SignalEngine::prescreen(plan, &series) {
        return SymbolOutcome::Skipped(reason);
    }

    if let Some(ref metrics) = ctx.metrics {
        metrics.indicator_computations_total.inc();
    }

    match SignalEngine::analyze(plan, &symbol.instrument_key, &series) {
        Ok(analysis) => match analysis.result {
            Some(result) => {
                info!(
                    symbol = %result.symbol,
                    conditions = %result.ratio_label(),
                    entry = result.entry_price,
                    stop_loss = result.stop_loss,
                    target = result.target,
                    "Symbol matched"
                );
                SymbolOutcome::Matched(result)
            }
            None => SymbolOutcome::Rejected {
                conditions_met: analysis.evaluation.conditions_met(),
                total_conditions: analysis.evaluation.total_conditions(),
            },
        },
        Err(reason) => {
            warn!(symbol = %symbol.name, %reason, "Analysis failed");
            SymbolOutcome::Skipped(reason)
        }
    }
}

fn record_fetch_failure(ctx: &JobContext) {
    if let Some(ref metrics) = ctx.metrics {
        metrics.fetch_failures_total.inc();
    }
}
