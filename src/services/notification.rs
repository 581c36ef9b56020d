//! Scan digest delivery (Telegram)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::result::{ScanSummary, ScreenResult};

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";
/// Digest entries beyond this are summarised as a count.
pub const DEFAULT_DIGEST_LIMIT: usize = 20;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("notification channel is not configured")]
    NotConfigured,
    #[error("notification transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("notification rejected ({status}): {description}")]
    Rejected { status: u16, description: String },
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NotificationError>;
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramNotifier {
    base_url: String,
    bot_token: String,
    chat_id: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self, NotificationError> {
        Self::with_base_url(TELEGRAM_API_URL, bot_token, chat_id)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotificationError> {
        if !self.is_configured() {
            return Err(NotificationError::NotConfigured);
        }

        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);
        let response = self
            .client
            .post(&url)
            .json(&SendMessageRequest {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await?;

        let status = response.status();
        let body: Option<TelegramResponse> = response.json().await.ok();
        match body {
            Some(TelegramResponse { ok: true, .. }) if status.is_success() => Ok(()),
            other => Err(NotificationError::Rejected {
                status: status.as_u16(),
                description: other
                    .and_then(|b| b.description)
                    .unwrap_or_else(|| "unknown error".to_string()),
            }),
        }
    }
}

/// Send `text`, turning any failure into a warning for the caller.
/// Returns `None` on success.
pub async fn deliver(sink: &dyn NotificationSink, text: &str) -> Option<String> {
    match sink.send(text).await {
        Ok(()) => {
            info!("Digest delivered");
            None
        }
        Err(e) => {
            warn!(error = %e, "Digest delivery failed");
            Some(e.to_string())
        }
    }
}

/// Context printed in the digest header.
#[derive(Debug, Clone)]
pub struct DigestContext {
    pub rule_set: String,
    pub required: usize,
    pub total: usize,
    pub min_history: usize,
    pub price_floor: f64,
    pub volume_floor: f64,
    pub limit: usize,
}

fn format_optional(value: Option<f64>, precision: usize, suffix: &str) -> String {
    match value {
        Some(v) => format!("{:.*}{}", precision, v, suffix),
        None => "N/A".to_string(),
    }
}

/// Chat message summarising a ranked scan.
pub fn build_digest(results: &[ScreenResult], summary: &ScanSummary, ctx: &DigestContext) -> String {
    let mut text = String::new();

    if results.is_empty() {
        let _ = writeln!(
            text,
            "No signals found with {}/{} conditions ({})",
            ctx.required, ctx.total, ctx.rule_set
        );
        let _ = writeln!(text, "Screened with {}+ candle requirement", ctx.min_history);
        let _ = writeln!(
            text,
            "Early filters: price >= {:.0}, volume >= {:.0}",
            ctx.price_floor, ctx.volume_floor
        );
    } else {
        let _ = writeln!(
            text,
            "{} signals found ({}, {}+ of {} conditions):",
            results.len(),
            ctx.rule_set,
            ctx.required,
            ctx.total
        );
        for (i, r) in results.iter().take(ctx.limit).enumerate() {
            let _ = writeln!(text);
            let _ = writeln!(text, "{}. {} ({})", i + 1, r.symbol, r.ratio_label());
            let _ = writeln!(
                text,
                "Entry: {:.2} | SL: {:.2} | Target: {:.2}",
                r.entry_price, r.stop_loss, r.target
            );
            let _ = writeln!(
                text,
                "RSI: {} | Vol: {} | Gap: {}",
                format_optional(r.aux.rsi, 1, ""),
                format_optional(r.aux.volume_ratio, 1, "x"),
                format_optional(r.aux.gap_pct, 1, "%")
            );
        }
        if results.len() > ctx.limit {
            let _ = writeln!(text);
            let _ = writeln!(text, "...and {} more", results.len() - ctx.limit);
        }
    }

    let _ = writeln!(text);
    let _ = write!(text, "{}", summary);
    text
}
