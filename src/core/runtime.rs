//! Bounded worker pool driving one scan over a symbol universe

use futures_util::future::join_all;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::DEFAULT_CONCURRENCY;
use crate::jobs::context::JobContext;
use crate::jobs::handlers::handle_symbol;
use crate::jobs::types::{SymbolJob, SymbolOutcome};
use crate::models::result::{ScanSummary, ScreenResult};
use crate::models::symbol::SymbolEntry;
use crate::signals::ranking::ResultRanker;

/// Ranked results and counts for one scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub results: Vec<ScreenResult>,
    pub summary: ScanSummary,
}

#[derive(Debug, Error)]
pub enum ScanError {
    /// Credentials were rejected. `partial` holds every result collected
    /// before the abort.
    #[error("scan aborted, authentication failed: {message}")]
    Auth {
        message: String,
        partial: Box<ScanReport>,
    },
}

/// Emitted once per finished symbol, in completion order.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    pub completed: usize,
    pub total: usize,
    pub symbol: SymbolEntry,
    pub outcome: SymbolOutcome,
}

type JobQueue = Arc<Mutex<VecDeque<SymbolJob>>>;

pub struct ScreenerRuntime {
    context: Arc<JobContext>,
    concurrency: usize,
    ranker: ResultRanker,
    progress: Option<UnboundedSender<ScanProgress>>,
}

impl ScreenerRuntime {
    pub fn new(context: Arc<JobContext>) -> Self {
        Self {
            context,
            concurrency: DEFAULT_CONCURRENCY,
            ranker: ResultRanker::default(),
            progress: None,
        }
    }

    /// Maximum number of symbol pipelines in flight (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_ranker(mut self, ranker: ResultRanker) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn with_progress(mut self, sender: UnboundedSender<ScanProgress>) -> Self {
        self.progress = Some(sender);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Screen every symbol and return the ranked results.
    ///
    /// Workers pull from a shared queue; outcomes flow through one channel
    /// to a single collector. An authentication failure stops workers from
    /// taking new symbols, lets in-flight pipelines finish, and returns the
    /// partial report inside [`ScanError::Auth`].
    pub async fn run(&self, symbols: &[SymbolEntry]) -> Result<ScanReport, ScanError> {
        let start = Instant::now();
        let total = symbols.len();
        let workers = self.concurrency.min(total);

        info!(
            symbols = total,
            concurrency = workers,
            rule_set = %self.context.plan.rules.name,
            conditions = self.context.plan.total_conditions(),
            min_history = self.context.plan.min_history(),
            "Starting scan"
        );

        let queue: JobQueue = Arc::new(Mutex::new(
            symbols
                .iter()
                .cloned()
                .enumerate()
                .map(|(index, symbol)| SymbolJob { index, symbol })
                .collect(),
        ));
        let cancelled = Arc::new(AtomicBool::new(false));
        let (tx, mut rx) = mpsc::unbounded_channel::<(SymbolJob, SymbolOutcome)>();

        let handles: Vec<_> = (0..workers)
            .map(|worker_id| {
                let queue = queue.clone();
                let cancelled = cancelled.clone();
                let context = self.context.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    run_worker(worker_id, queue, cancelled, context, tx).await;
                })
            })
            .collect();
        drop(tx);

        let mut summary = ScanSummary::default();
        let mut results = Vec::new();
        let mut auth_failure: Option<String> = None;
        let mut completed = 0usize;

        while let Some((job, outcome)) = rx.recv().await {
            completed += 1;
            summary.scanned += 1;
            if let Some(ref metrics) = self.context.metrics {
                metrics.symbols_scanned_total.inc();
            }

            match &outcome {
                SymbolOutcome::Matched(result) => {
                    summary.matched += 1;
                    if let Some(ref metrics) = self.context.metrics {
                        metrics.symbols_matched_total.inc();
                    }
                    results.push(result.clone());
                }
                SymbolOutcome::Rejected {
                    conditions_met,
                    total_conditions,
                } => {
                    debug!(
                        symbol = %job.symbol.name,
                        conditions_met,
                        total_conditions,
                        "Below threshold"
                    );
                }
                SymbolOutcome::Skipped(reason) => {
                    summary.record_skip(*reason);
                    if let Some(ref metrics) = self.context.metrics {
                        metrics.record_skip(*reason);
                    }
                }
                SymbolOutcome::Aborted(message) => {
                    if auth_failure.is_none() {
                        auth_failure = Some(message.clone());
                    }
                }
            }

            if let Some(ref progress) = self.progress {
                // A dropped receiver only means nobody is watching.
                let _ = progress.send(ScanProgress {
                    completed,
                    total,
                    symbol: job.symbol,
                    outcome,
                });
            }
        }

        for joined in join_all(handles).await {
            if let Err(e) = joined {
                error!(error = %e, "Scan worker terminated abnormally");
            }
        }

        summary.not_attempted = queue.lock().await.len();
        summary.duration = start.elapsed();

        let report = ScanReport {
            results: self.ranker.rank(results),
            summary,
        };

        info!(
            scanned = report.summary.scanned,
            matched = report.summary.matched,
            skipped = report.summary.total_skipped(),
            not_attempted = report.summary.not_attempted,
            duration_ms = report.summary.duration.as_millis() as u64,
            "Scan finished"
        );
        for (reason, count) in &report.summary.skipped {
            info!(%reason, count, "Skipped symbols");
        }

        match auth_failure {
            Some(message) => {
                warn!(
                    error = %message,
                    not_attempted = report.summary.not_attempted,
                    "Scan aborted on authentication failure"
                );
                Err(ScanError::Auth {
                    message,
                    partial: Box::new(report),
                })
            }
            None => Ok(report),
        }
    }
}

async fn run_worker(
    worker_id: usize,
    queue: JobQueue,
    cancelled: Arc<AtomicBool>,
    context: Arc<JobContext>,
    tx: UnboundedSender<(SymbolJob, SymbolOutcome)>,
) {
    loop {
        // The flag is read and written under the queue lock, so no symbol is
        // taken after an abort has been observed.
        let job = {
            let mut pending = queue.lock().await;
            if cancelled.load(Ordering::SeqCst) {
                None
            } else {
                pending.pop_front()
            }
        };
        let Some(job) = job else {
            break;
        };

        debug!(worker_id, index = job.index, symbol = %job.symbol.name, "Processing symbol");
        let outcome = handle_symbol(&job, &context).await;

        if outcome.is_abort() {
            let _pending = queue.lock().await;
            cancelled.store(true, Ordering::SeqCst);
        }
        if tx.send((job, outcome)).is_err() {
            break;
        }
    }
}
