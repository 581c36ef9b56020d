//! Upstox v2 REST payloads

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

use crate::models::candle::Candle;

#[derive(Debug, Deserialize)]
pub struct HistoricalCandleResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<CandleData>,
}

#[derive(Debug, Deserialize)]
pub struct CandleData {
    #[serde(default)]
    pub candles: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<ProfileData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileData {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default, rename = "errorCode")]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn summary(&self) -> Option<String> {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| match (&e.error_code, &e.message) {
                (Some(code), Some(message)) => format!("{}: {}", code, message),
                (Some(code), None) => code.clone(),
                (None, Some(message)) => message.clone(),
                (None, None) => "unknown error".to_string(),
            })
            .collect();
        (!parts.is_empty()).then(|| parts.join("; "))
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn trading_day(value: &Value) -> Option<NaiveDate> {
    let raw = value.as_str()?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    raw.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
}

/// Parse one `[timestamp, open, high, low, close, volume, oi]` row.
pub fn parse_candle_row(row: &[Value]) -> Result<Candle, String> {
    if row.len() < 6 {
        return Err(format!("expected at least 6 fields, got {}", row.len()));
    }
    let timestamp =
        trading_day(&row[0]).ok_or_else(|| format!("invalid timestamp {}", row[0]))?;

    let mut fields = [0.0; 5];
    for (slot, value) in fields.iter_mut().zip(&row[1..6]) {
        *slot = number(value).ok_or_else(|| format!("invalid numeric field {}", value))?;
    }
    let [open, high, low, close, volume] = fields;

    Ok(Candle::new(open, high, low, close, volume, timestamp))
}
