//! Computes requested indicators over a candle series

use tracing::trace;

use crate::indicators::momentum::{calculate_macd, calculate_rsi, calculate_stoch_rsi};
use crate::indicators::structure::calculate_highest_high;
use crate::indicators::trend::{calculate_dmi, calculate_ema, calculate_sma};
use crate::indicators::volatility::{calculate_atr, calculate_bollinger_bands};
use crate::indicators::volume::calculate_volume_sma;
use crate::models::candle::Series;
use crate::models::indicators::{IndicatorKind, IndicatorRequest, IndicatorSet};

/// Column vectors extracted once per series.
struct Columns {
    highs: Vec<f64>,
    lows: Vec<f64>,
    closes: Vec<f64>,
    volumes: Vec<f64>,
}

impl Columns {
    fn from_series(series: &Series) -> Self {
        Self {
            highs: series.highs(),
            lows: series.lows(),
            closes: series.closes(),
            volumes: series.volumes(),
        }
    }
}

pub struct IndicatorEngine;

impl IndicatorEngine {
    /// Compute every request over `series`.
    ///
    /// Pure and deterministic. A request needing more history than the
    /// series holds yields all-undefined outputs rather than an error.
    pub fn compute(series: &Series, requests: &[IndicatorRequest]) -> IndicatorSet {
        let columns = Columns::from_series(series);
        let mut set = IndicatorSet::new(series.len());

        for request in requests {
            Self::compute_request(&columns, request, &mut set);
            trace!(
                symbol = %series.symbol(),
                indicator = %request.name,
                kind = %request.kind,
                "Computed indicator"
            );
        }
        set
    }

    fn compute_request(columns: &Columns, request: &IndicatorRequest, set: &mut IndicatorSet) {
        let name = request.name.as_str();
        let key = |component: &str| format!("{}_{}", name, component);

        match request.kind {
            IndicatorKind::Sma { period } => {
                set.insert(name, calculate_sma(&columns.closes, period));
            }
            IndicatorKind::Ema { span } => {
                set.insert(name, calculate_ema(&columns.closes, span));
            }
            IndicatorKind::Rsi { period } => {
                set.insert(name, calculate_rsi(&columns.closes, period));
            }
            IndicatorKind::StochRsi { period } => {
                set.insert(name, calculate_stoch_rsi(&columns.closes, period));
            }
            IndicatorKind::Macd { fast, slow, signal } => {
                let macd = calculate_macd(&columns.closes, fast, slow, signal);
                set.insert(key("line"), macd.line);
                set.insert(key("signal"), macd.signal);
                set.insert(key("histogram"), macd.histogram);
            }
            IndicatorKind::Adx { period } => {
                let dmi = calculate_dmi(&columns.highs, &columns.lows, &columns.closes, period);
                set.insert(key("adx"), dmi.adx);
                set.insert(key("plus_di"), dmi.plus_di);
                set.insert(key("minus_di"), dmi.minus_di);
            }
            IndicatorKind::Bollinger { period, std_dev } => {
                let bands = calculate_bollinger_bands(&columns.closes, period, std_dev);
                set.insert(key("upper"), bands.upper);
                set.insert(key("middle"), bands.middle);
                set.insert(key("lower"), bands.lower);
            }
            IndicatorKind::Atr { period } => {
                set.insert(
                    name,
                    calculate_atr(&columns.highs, &columns.lows, &columns.closes, period),
                );
            }
            IndicatorKind::VolumeSma { period } => {
                set.insert(name, calculate_volume_sma(&columns.volumes, period));
            }
            IndicatorKind::HighestHigh { period } => {
                set.insert(name, calculate_highest_high(&columns.highs, period));
            }
        }
    }
}
