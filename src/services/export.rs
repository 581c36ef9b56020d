//! Flat CSV export of ranked results

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::models::result::ScreenResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportColumn {
    Symbol,
    InstrumentKey,
    Conditions,
    Entry,
    StopLoss,
    Target,
    Rsi,
    VolumeRatio,
    AtrPct,
    GapPct,
    AtrProxy,
}

pub const DEFAULT_COLUMNS: [ExportColumn; 9] = [
    ExportColumn::Symbol,
    ExportColumn::Conditions,
    ExportColumn::Entry,
    ExportColumn::StopLoss,
    ExportColumn::Target,
    ExportColumn::Rsi,
    ExportColumn::VolumeRatio,
    ExportColumn::AtrPct,
    ExportColumn::GapPct,
];

impl ExportColumn {
    pub fn header(&self) -> &'static str {
        match self {
            ExportColumn::Symbol => "symbol",
            ExportColumn::InstrumentKey => "instrument_key",
            ExportColumn::Conditions => "conditions_met",
            ExportColumn::Entry => "entry",
            ExportColumn::StopLoss => "stop_loss",
            ExportColumn::Target => "target",
            ExportColumn::Rsi => "rsi",
            ExportColumn::VolumeRatio => "volume_ratio",
            ExportColumn::AtrPct => "atr_pct",
            ExportColumn::GapPct => "gap_pct",
            ExportColumn::AtrProxy => "atr_proxy",
        }
    }

    fn value(&self, result: &ScreenResult) -> String {
        let optional = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_default();
        match self {
            ExportColumn::Symbol => result.symbol.clone(),
            ExportColumn::InstrumentKey => result.instrument_key.clone(),
            ExportColumn::Conditions => result.ratio_label(),
            ExportColumn::Entry => format!("{:.2}", result.entry_price),
            ExportColumn::StopLoss => format!("{:.2}", result.stop_loss),
            ExportColumn::Target => format!("{:.2}", result.target),
            ExportColumn::Rsi => optional(result.aux.rsi),
            ExportColumn::VolumeRatio => optional(result.aux.volume_ratio),
            ExportColumn::AtrPct => optional(result.aux.atr_pct),
            ExportColumn::GapPct => optional(result.aux.gap_pct),
            ExportColumn::AtrProxy => result.atr_is_proxy.to_string(),
        }
    }
}

impl FromStr for ExportColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ALL_COLUMNS
            .iter()
            .copied()
            .find(|c| c.header() == wanted)
            .ok_or_else(|| format!("unknown export column '{}'", s.trim()))
    }
}

const ALL_COLUMNS: [ExportColumn; 11] = [
    ExportColumn::Symbol,
    ExportColumn::InstrumentKey,
    ExportColumn::Conditions,
    ExportColumn::Entry,
    ExportColumn::StopLoss,
    ExportColumn::Target,
    ExportColumn::Rsi,
    ExportColumn::VolumeRatio,
    ExportColumn::AtrPct,
    ExportColumn::GapPct,
    ExportColumn::AtrProxy,
];

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// One header row plus one row per result, in the given order.
pub fn to_csv(results: &[ScreenResult], columns: &[ExportColumn]) -> String {
    let mut out = String::new();
    let header: Vec<&str> = columns.iter().map(ExportColumn::header).collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for result in results {
        let row: Vec<String> = columns.iter().map(|c| escape(&c.value(result))).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

pub fn write_csv(
    path: impl AsRef<Path>,
    results: &[ScreenResult],
    columns: &[ExportColumn],
) -> std::io::Result<()> {
    std::fs::write(path, to_csv(results, columns))
}
