//! Screener configuration
//!
//! Values come from explicit construction, then environment variables
//! (`.env` is loaded by the binaries through `dotenvy`), then defaults. The
//! resulting [`ScreenerConfig`] is immutable for the lifetime of a scan.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::models::strategy::{RuleSet, RuleSetError, ThresholdMode};
use crate::models::symbol::SymbolEntry;
use crate::services::export::{ExportColumn, DEFAULT_COLUMNS};
use crate::services::upstox::client::DEFAULT_BASE_URL;
use crate::signals::decision::{StopPolicy, TradeParams};
use crate::signals::engine::MIN_CANDLES;
use crate::signals::filter::EarlyFilter;
use crate::signals::ranking::TieBreak;
use crate::strategies::presets;

pub const DEFAULT_PRESET: &str = "elite";
pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_LOOKBACK_DAYS: u32 = 400;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

const SYMBOL_HEADER: [&str; 2] = ["instrument_key", "tradingsymbol"];

/// Universe used when no symbols file is configured.
pub const DEFAULT_SYMBOLS: &str = "instrument_key,tradingsymbol
NSE_EQ|INE585B01010,MARUTI
NSE_EQ|INE139A01034,NATIONALUM
NSE_EQ|INE763I01026,TARIL
NSE_EQ|INE970X01018,LEMONTREE
NSE_EQ|INE522D01027,MANAPPURAM
NSE_EQ|INE427F01016,CHALET
NSE_EQ|INE00R701025,DALBHARAT
NSE_EQ|INE917I01010,BAJAJ-AUTO
NSE_EQ|INE146L01010,KIRLOSENG
NSE_EQ|INE267A01025,HINDZINC
NSE_EQ|INE466L01038,360ONE
NSE_EQ|INE070A01015,SHREECEM
NSE_EQ|INE242C01024,ANANTRAJ
NSE_EQ|INE883F01010,AADHARHFC
NSE_EQ|INE749A01030,JINDALSTEL
NSE_EQ|INE171Z01026,BDL
NSE_EQ|INE591G01017,COFORGE
NSE_EQ|INE903U01023,SIGNATURE
NSE_EQ|INE160A01022,PNB
NSE_EQ|INE640A01023,SKFINDIA
NSE_EQ|INE814H01011,ADANIPOWER
NSE_EQ|INE736A01011,CDSL
NSE_EQ|INE301A01014,RAYMOND
NSE_EQ|INE102D01028,GODREJCP
";

/// Deployment environment (`APP_ENV`), `sandbox` when unset.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid rule set in {path}: {source}")]
    RuleFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown preset '{0}' (expected one of: elite, advanced, trend)")]
    UnknownPreset(String),
    #[error(transparent)]
    Rules(#[from] RuleSetError),
    #[error("symbol list line {line}: {reason}")]
    SymbolRow { line: usize, reason: String },
    #[error("symbol list contains no symbols")]
    NoSymbols,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    pub upstox_token: Option<String>,
    pub upstox_base_url: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub symbols_file: Option<PathBuf>,
    pub preset: String,
    /// JSON rule set; takes precedence over `preset`.
    pub rules_file: Option<PathBuf>,
    /// Restrict the rule set to these rules. Empty keeps all of them.
    pub rule_names: Vec<String>,
    /// `None` means strict mode.
    pub min_conditions: Option<usize>,
    pub concurrency: usize,
    pub lookback_days: u32,
    pub min_candles: usize,
    pub filter: EarlyFilter,
    pub fetch_timeout_secs: u64,
    /// Zero disables the candle cache.
    pub cache_ttl_secs: u64,
    pub stop_policy: StopPolicy,
    pub sort: TieBreak,
    /// CSV export path.
    pub output: Option<PathBuf>,
    /// Columns written to the CSV export, in order.
    pub export_columns: Vec<ExportColumn>,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            upstox_token: None,
            upstox_base_url: DEFAULT_BASE_URL.to_string(),
            telegram_bot_token: None,
            telegram_chat_id: None,
            symbols_file: None,
            preset: DEFAULT_PRESET.to_string(),
            rules_file: None,
            rule_names: Vec::new(),
            min_conditions: None,
            concurrency: DEFAULT_CONCURRENCY,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            min_candles: MIN_CANDLES,
            filter: EarlyFilter::default(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            stop_policy: StopPolicy::default(),
            sort: TieBreak::default(),
            output: None,
            export_columns: DEFAULT_COLUMNS.to_vec(),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                key,
                reason: format!("'{}': {}", raw, e),
            }),
        None => Ok(None),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ScreenerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or blank keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.upstox_token = non_empty(lookup("UPSTOX_ACCESS_TOKEN"));
        if let Some(url) = non_empty(lookup("UPSTOX_BASE_URL")) {
            config.upstox_base_url = url;
        }
        config.telegram_bot_token = non_empty(lookup("TELEGRAM_BOT_TOKEN"));
        config.telegram_chat_id = non_empty(lookup("TELEGRAM_CHAT_ID"));
        config.symbols_file = non_empty(lookup("SCREENER_SYMBOLS_FILE")).map(PathBuf::from);
        if let Some(preset) = non_empty(lookup("SCREENER_PRESET")) {
            config.preset = preset;
        }
        config.rules_file = non_empty(lookup("SCREENER_RULES_FILE")).map(PathBuf::from);
        if let Some(names) = non_empty(lookup("SCREENER_RULE_NAMES")) {
            config.rule_names = names
                .split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .collect();
        }
        config.min_conditions = parse_var(&lookup, "SCREENER_MIN_CONDITIONS")?;

        if let Some(concurrency) = parse_var::<usize, _>(&lookup, "SCREENER_CONCURRENCY")? {
            if concurrency == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "SCREENER_CONCURRENCY",
                    reason: "must be at least 1".to_string(),
                });
            }
            config.concurrency = concurrency;
        }
        if let Some(days) = parse_var(&lookup, "SCREENER_LOOKBACK_DAYS")? {
            config.lookback_days = days;
        }
        if let Some(candles) = parse_var(&lookup, "SCREENER_MIN_CANDLES")? {
            config.min_candles = candles;
        }
        if let Some(floor) = parse_var(&lookup, "SCREENER_PRICE_FLOOR")? {
            config.filter.price_floor = floor;
        }
        if let Some(floor) = parse_var(&lookup, "SCREENER_VOLUME_FLOOR")? {
            config.filter.volume_floor = floor;
        }
        if let Some(window) = parse_var(&lookup, "SCREENER_VOLUME_WINDOW")? {
            config.filter.volume_window = window;
        }
        if let Some(secs) = parse_var(&lookup, "SCREENER_FETCH_TIMEOUT_SECS")? {
            config.fetch_timeout_secs = secs;
        }
        if let Some(secs) = parse_var(&lookup, "SCREENER_CACHE_TTL_SECS")? {
            config.cache_ttl_secs = secs;
        }
        if let Some(policy) = parse_var(&lookup, "SCREENER_STOP_POLICY")? {
            config.stop_policy = policy;
        }
        if let Some(sort) = parse_var(&lookup, "SCREENER_SORT")? {
            config.sort = sort;
        }
        config.output = non_empty(lookup("SCREENER_OUTPUT")).map(PathBuf::from);
        if let Some(columns) = non_empty(lookup("SCREENER_EXPORT_COLUMNS")) {
            config.export_columns = parse_export_columns(&columns)?;
        }

        Ok(config)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn trade_params(&self) -> TradeParams {
        TradeParams {
            stop_policy: self.stop_policy,
            ..TradeParams::default()
        }
    }

    pub fn threshold(&self) -> ThresholdMode {
        match self.min_conditions {
            Some(min) => ThresholdMode::AtLeast { min },
            None => ThresholdMode::Strict,
        }
    }

    /// Rule file if configured, otherwise the named preset, narrowed to
    /// `rule_names` when that is non-empty.
    pub fn load_rule_set(&self) -> Result<RuleSet, ConfigError> {
        let rules = match self.rules_file {
            Some(ref path) => {
                let text = read_file(path)?;
                let rules: RuleSet =
                    serde_json::from_str(&text).map_err(|source| ConfigError::RuleFile {
                        path: path.clone(),
                        source,
                    })?;
                rules.validate()?;
                rules
            }
            None => presets::by_name(&self.preset)
                .ok_or_else(|| ConfigError::UnknownPreset(self.preset.clone()))?,
        };

        if self.rule_names.is_empty() {
            Ok(rules)
        } else {
            Ok(rules.subset(&self.rule_names)?)
        }
    }

    pub fn load_symbols(&self) -> Result<Vec<SymbolEntry>, ConfigError> {
        match self.symbols_file {
            Some(ref path) => parse_symbol_csv(&read_file(path)?),
            None => parse_symbol_csv(DEFAULT_SYMBOLS),
        }
    }
}

/// Comma-separated column names, e.g. `symbol,entry,stop_loss`.
fn parse_export_columns(raw: &str) -> Result<Vec<ExportColumn>, ConfigError> {
    let columns = raw
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::parse::<ExportColumn>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|reason| ConfigError::InvalidValue {
            key: "SCREENER_EXPORT_COLUMNS",
            reason,
        })?;

    if columns.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "SCREENER_EXPORT_COLUMNS",
            reason: "no columns listed".to_string(),
        });
    }
    Ok(columns)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse `instrument_key,tradingsymbol` CSV. Blank lines are ignored; the
/// header is required.
pub fn parse_symbol_csv(text: &str) -> Result<Vec<SymbolEntry>, ConfigError> {
    let mut rows = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let Some((line, header)) = rows.next() else {
        return Err(ConfigError::NoSymbols);
    };
    let columns: Vec<String> = header
        .split(',')
        .map(|c| c.trim().to_ascii_lowercase())
        .collect();
    if columns != SYMBOL_HEADER {
        return Err(ConfigError::SymbolRow {
            line,
            reason: format!("expected header '{}'", SYMBOL_HEADER.join(",")),
        });
    }

    let mut symbols = Vec::new();
    for (line, row) in rows {
        let fields: Vec<&str> = row.split(',').map(str::trim).collect();
        match fields.as_slice() {
            [key, name] if !key.is_empty() && !name.is_empty() => {
                symbols.push(SymbolEntry::new(*key, *name));
            }
            _ => {
                return Err(ConfigError::SymbolRow {
                    line,
                    reason: format!("expected 'instrument_key,tradingsymbol', got '{}'", row),
                })
            }
        }
    }

    if symbols.is_empty() {
        return Err(ConfigError::NoSymbols);
    }
    Ok(symbols)
}
