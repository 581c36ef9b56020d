//! Per-symbol screening pipeline: history check, early filter, indicator
//! computation, rule evaluation and trade-level synthesis.

use thiserror::Error;
use tracing::debug;

use crate::indicators::engine::IndicatorEngine;
use crate::indicators::error::IndicatorError;
use crate::indicators::registry::{max_warmup, IndicatorRegistry};
use crate::indicators::volume::volume_ratio;
use crate::models::candle::Series;
use crate::models::indicators::{IndicatorRequest, Snapshot};
use crate::models::result::{AuxMetrics, ScreenResult, SkipReason};
use crate::models::strategy::{RuleSet, RuleSetError, ThresholdMode};
use crate::signals::decision::{TradeLevels, TradeParams};
use crate::signals::filter::{EarlyFilter, FilterDecision};
use crate::strategies::evaluator::{ConditionEvaluator, Evaluation};

pub const MIN_CANDLES: usize = 200;

pub const ATR_KEY: &str = "atr14";
pub const RSI_KEY: &str = "rsi14";
pub const VOLUME_AVERAGE_KEY: &str = "vol_sma50";
pub const LOWER_BAND_KEY: &str = "bb_lower";

const AUX_KEYS: [&str; 4] = [ATR_KEY, RSI_KEY, VOLUME_AVERAGE_KEY, LOWER_BAND_KEY];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error(transparent)]
    Rules(#[from] RuleSetError),
    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}

/// Everything needed to screen one symbol, fixed at scan start.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    pub rules: RuleSet,
    pub threshold: ThresholdMode,
    pub filter: EarlyFilter,
    pub trade: TradeParams,
    requests: Vec<IndicatorRequest>,
    min_history: usize,
}

impl ScanPlan {
    /// Resolve the indicators the rules depend on and the history they need.
    ///
    /// Rule dependencies must all resolve against `registry` (plus any extra
    /// requests declared by the rule set). Indicators used only for trade
    /// levels and auxiliary metrics are added when the registry knows them
    /// and do not raise the history requirement.
    pub fn compile(
        rules: RuleSet,
        threshold: ThresholdMode,
        registry: &IndicatorRegistry,
        min_candles: usize,
        filter: EarlyFilter,
        trade: TradeParams,
    ) -> Result<Self, PlanError> {
        rules.validate()?;
        threshold.validate(rules.len())?;

        let mut registry = registry.clone();
        registry.register_specs(&rules.indicators)?;

        let dependencies = rules.dependencies();
        let rule_requests = registry.select(dependencies.iter().map(String::as_str))?;
        let min_history = min_candles.max(max_warmup(&rule_requests));

        let aux_keys = AUX_KEYS
            .iter()
            .copied()
            .filter(|key| registry.producer_of(key).is_some());
        let requests = registry.select(
            dependencies
                .iter()
                .map(String::as_str)
                .chain(aux_keys),
        )?;

        Ok(Self {
            rules,
            threshold,
            filter,
            trade,
            requests,
            min_history,
        })
    }

    pub fn requests(&self) -> &[IndicatorRequest] {
        &self.requests
    }

    /// Candles a series must hold before it is evaluated.
    pub fn min_history(&self) -> usize {
        self.min_history
    }

    pub fn total_conditions(&self) -> usize {
        self.rules.len()
    }
}

/// Result of running indicators and rules over one series.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub evaluation: Evaluation,
    /// Present when the evaluation met the threshold.
    pub result: Option<ScreenResult>,
}

pub struct SignalEngine;

impl SignalEngine {
    /// History and early-filter checks. No indicator work happens here.
    pub fn prescreen(plan: &ScanPlan, series: &Series) -> Result<(), SkipReason> {
        if series.len() < plan.min_history() {
            debug!(
                symbol = %series.symbol(),
                candles = series.len(),
                required = plan.min_history(),
                "Insufficient history"
            );
            return Err(SkipReason::InsufficientHistory);
        }

        match plan.filter.check(series.candles()) {
            FilterDecision::Accept => Ok(()),
            decision => {
                debug!(symbol = %series.symbol(), ?decision, "Rejected by early filter");
                Err(SkipReason::Filtered)
            }
        }
    }

    /// Compute indicators, evaluate the rules and, on acceptance, build the
    /// result with trade levels.
    pub fn analyze(
        plan: &ScanPlan,
        instrument_key: &str,
        series: &Series,
    ) -> Result<Analysis, SkipReason> {
        let indicators = IndicatorEngine::compute(series, plan.requests());
        let snapshot = Snapshot::capture(series, &indicators);
        let evaluation = ConditionEvaluator::evaluate(&snapshot, &plan.rules);

        debug!(
            symbol = %series.symbol(),
            conditions_met = evaluation.conditions_met(),
            total = evaluation.total_conditions(),
            failed = ?evaluation.failed(),
            "Evaluated rules"
        );

        if !evaluation.is_accepted(plan.threshold) {
            return Ok(Analysis {
                evaluation,
                result: None,
            });
        }

        let entry = snapshot.latest.close;
        if !entry.is_finite() || entry <= 0.0 {
            return Err(SkipReason::Computation);
        }

        let levels = TradeLevels::synthesize(
            entry,
            snapshot.value(ATR_KEY),
            snapshot.value(LOWER_BAND_KEY),
            &plan.trade,
        );
        let result = ScreenResult {
            symbol: series.symbol().to_string(),
            instrument_key: instrument_key.to_string(),
            conditions_met: evaluation.conditions_met(),
            total_conditions: evaluation.total_conditions(),
            entry_price: levels.entry,
            stop_loss: levels.stop_loss,
            target: levels.target,
            atr_is_proxy: levels.atr_is_proxy,
            aux: aux_metrics(&snapshot),
        };

        Ok(Analysis {
            evaluation,
            result: Some(result),
        })
    }
}

fn aux_metrics(snapshot: &Snapshot) -> AuxMetrics {
    let latest = &snapshot.latest;
    AuxMetrics {
        rsi: snapshot.value(RSI_KEY),
        volume_ratio: volume_ratio(latest.volume, snapshot.value(VOLUME_AVERAGE_KEY)),
        atr_pct: snapshot
            .value(ATR_KEY)
            .filter(|_| latest.close > 0.0)
            .map(|atr| atr / latest.close * 100.0),
        gap_pct: snapshot
            .previous
            .filter(|prev| prev.high > 0.0)
            .map(|prev| (latest.low / prev.high - 1.0) * 100.0),
    }
}
