//! Upstox v2 REST client with bearer-token auth and transient retry

use backon::{ExponentialBuilder, Retryable};
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use thiserror::Error;
use url::{form_urlencoded, Url};

use crate::models::result::SkipReason;
use crate::services::market_data::DataError;

use super::messages::{ErrorResponse, HistoricalCandleResponse, ProfileResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.upstox.com";
const MAX_RETRIES: usize = 3;

/// Failure of a single HTTP attempt.
#[derive(Debug)]
enum AttemptError {
    Transport(reqwest::Error),
    Status { status: StatusCode, body: String },
}

impl AttemptError {
    /// Transport failures, 429 and 5xx are worth another attempt. 401 never is.
    fn is_transient(&self) -> bool {
        match self {
            AttemptError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            AttemptError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
        }
    }

    fn into_data_error(self) -> DataError {
        match self {
            AttemptError::Transport(e) if e.is_timeout() => {
                DataError::unavailable(SkipReason::Timeout, e.to_string())
            }
            AttemptError::Transport(e) if e.is_decode() => {
                DataError::unavailable(SkipReason::Malformed, e.to_string())
            }
            AttemptError::Transport(e) => {
                DataError::unavailable(SkipReason::Transport, e.to_string())
            }
            AttemptError::Status { status, body } => {
                let detail = serde_json::from_str::<ErrorResponse>(&body)
                    .ok()
                    .and_then(|e| e.summary())
                    .unwrap_or(body);
                match status {
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                        DataError::Auth(format!("{}: {}", status, detail))
                    }
                    s if s.is_server_error() || s == StatusCode::TOO_MANY_REQUESTS => {
                        DataError::unavailable(SkipReason::Transport, format!("{}: {}", s, detail))
                    }
                    s => DataError::unavailable(SkipReason::Malformed, format!("{}: {}", s, detail)),
                }
            }
        }
    }
}

/// Failure to construct the client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid Upstox base URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct UpstoxClient {
    base_url: Url,
    access_token: String,
    client: reqwest::Client,
}

impl UpstoxClient {
    pub fn new(
        base_url: &str,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: Url::parse(base_url)?,
            access_token: access_token.into(),
            client,
        })
    }

    /// `base/v2/<segments...>` with each segment percent-encoded, so
    /// instrument keys such as `NSE_EQ|INE002A01018` travel as `NSE_EQ%7C...`.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let encoded: Vec<String> = segments
            .iter()
            .map(|s| form_urlencoded::byte_serialize(s.as_bytes()).collect())
            .collect();
        let base = self.base_url.path().trim_end_matches('/').to_string();
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}/v2/{}", base, encoded.join("/")));
        url
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &Url) -> Result<T, AttemptError> {
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(AttemptError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptError::Status { status, body });
        }
        response.json::<T>().await.map_err(AttemptError::Transport)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, DataError> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(200))
            .with_max_delay(Duration::from_secs(2))
            .with_max_times(MAX_RETRIES);

        (|| self.get_once::<T>(&url))
            .retry(backoff)
            .when(AttemptError::is_transient)
            .notify(|err, delay| {
                warn!(url = %url.path(), error = ?err, ?delay, "Retrying Upstox request");
            })
            .await
            .map_err(AttemptError::into_data_error)
    }

    /// GET /v2/historical-candle/{key}/day/{to}/{from}
    pub async fn historical_candles(
        &self,
        instrument_key: &str,
        to: NaiveDate,
        from: NaiveDate,
    ) -> Result<HistoricalCandleResponse, DataError> {
        let to = to.format("%Y-%m-%d").to_string();
        let from = from.format("%Y-%m-%d").to_string();
        let url = self.endpoint(&["historical-candle", instrument_key, "day", &to, &from]);
        debug!(instrument_key, %to, %from, "Fetching daily candles");
        self.get_json(url).await
    }

    /// GET /v2/user/profile
    pub async fn profile(&self) -> Result<ProfileResponse, DataError> {
        let url = self.endpoint(&["user", "profile"]);
        self.get_json(url).await
    }
}
