//! Catalogue of named indicator requests and output-key resolution

use std::collections::BTreeSet;

use crate::indicators::error::IndicatorError;
use crate::indicators::parser::parse_request;
use crate::indicators::validation::validate_request;
use crate::models::indicators::{IndicatorKind, IndicatorRequest};

/// Known indicator requests, looked up by the output keys rules reference.
#[derive(Debug, Clone)]
pub struct IndicatorRegistry {
    requests: Vec<IndicatorRequest>,
}

impl IndicatorRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            requests: Vec::new(),
        }
    }

    /// Registry holding the catalogue used by the built-in presets.
    pub fn standard() -> Self {
        let catalogue = [
            ("ema5", IndicatorKind::Ema { span: 5 }),
            ("ema13", IndicatorKind::Ema { span: 13 }),
            ("ema26", IndicatorKind::Ema { span: 26 }),
            ("sma20", IndicatorKind::Sma { period: 20 }),
            ("sma50", IndicatorKind::Sma { period: 50 }),
            ("sma100", IndicatorKind::Sma { period: 100 }),
            ("sma200", IndicatorKind::Sma { period: 200 }),
            ("rsi14", IndicatorKind::Rsi { period: 14 }),
            ("stoch_rsi14", IndicatorKind::StochRsi { period: 14 }),
            (
                "macd",
                IndicatorKind::Macd {
                    fast: 12,
                    slow: 26,
                    signal: 9,
                },
            ),
            ("dmi", IndicatorKind::Adx { period: 14 }),
            (
                "bb",
                IndicatorKind::Bollinger {
                    period: 20,
                    std_dev: 2.0,
                },
            ),
            ("atr14", IndicatorKind::Atr { period: 14 }),
            ("vol_sma50", IndicatorKind::VolumeSma { period: 50 }),
            ("high200", IndicatorKind::HighestHigh { period: 200 }),
            ("high300", IndicatorKind::HighestHigh { period: 300 }),
        ];

        Self {
            requests: catalogue
                .into_iter()
                .map(|(name, kind)| IndicatorRequest::new(name, kind))
                .collect(),
        }
    }

    /// Add a request. Its output keys must not collide with existing ones.
    pub fn register(&mut self, request: IndicatorRequest) -> Result<(), IndicatorError> {
        validate_request(&request)?;
        for key in request.output_keys() {
            if self.producer_of(&key).is_some() {
                return Err(IndicatorError::DuplicateOutput(key));
            }
        }
        self.requests.push(request);
        Ok(())
    }

    /// Register requests written in compact `name=kind:params` form.
    pub fn register_specs<S: AsRef<str>>(&mut self, specs: &[S]) -> Result<(), IndicatorError> {
        for spec in specs {
            self.register(parse_request(spec.as_ref())?)?;
        }
        Ok(())
    }

    pub fn requests(&self) -> &[IndicatorRequest] {
        &self.requests
    }

    /// The request whose outputs include `key`.
    pub fn producer_of(&self, key: &str) -> Option<&IndicatorRequest> {
        self.requests
            .iter()
            .find(|request| request.output_keys().iter().any(|k| k == key))
    }

    /// Minimal request list producing every key, in catalogue order.
    pub fn select<'a, I>(&self, keys: I) -> Result<Vec<IndicatorRequest>, IndicatorError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut wanted = BTreeSet::new();
        for key in keys {
            let producer = self
                .producer_of(key)
                .ok_or_else(|| IndicatorError::UnknownOutput(key.to_string()))?;
            wanted.insert(producer.name.as_str());
        }

        Ok(self
            .requests
            .iter()
            .filter(|request| wanted.contains(request.name.as_str()))
            .cloned()
            .collect())
    }
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Longest warm-up among `requests`, or 0 for none.
pub fn max_warmup(requests: &[IndicatorRequest]) -> usize {
    requests
        .iter()
        .map(|request| request.kind.warmup())
        .max()
        .unwrap_or(0)
}
