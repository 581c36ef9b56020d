//! Compact indicator request syntax: `name=kind:p1,p2,...`
//!
//! Examples: `ema5=ema:5`, `macd=macd:12,26,9`, `bb=bb:20,2`, `dmi=adx:14`.

use crate::indicators::error::IndicatorError;
use crate::indicators::validation::validate_request;
use crate::models::indicators::{IndicatorKind, IndicatorRequest};

pub fn parse_f64(value: &str) -> Result<f64, IndicatorError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| IndicatorError::InvalidNumericFormat(value.to_string()))
}

pub fn parse_period(value: &str) -> Result<usize, IndicatorError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| IndicatorError::InvalidNumericFormat(value.to_string()))
}

fn expect_params<'a>(
    kind: &str,
    params: &'a [&'a str],
    expected: usize,
) -> Result<&'a [&'a str], IndicatorError> {
    if params.len() != expected {
        return Err(IndicatorError::ParameterCount {
            kind: kind.to_string(),
            expected,
            actual: params.len(),
        });
    }
    Ok(params)
}

/// Parse the `kind:params` half of a request.
pub fn parse_kind(spec: &str) -> Result<IndicatorKind, IndicatorError> {
    let (label, rest) = spec.split_once(':').unwrap_or((spec, ""));
    let label = label.trim().to_ascii_lowercase();
    let params: Vec<&str> = if rest.trim().is_empty() {
        Vec::new()
    } else {
        rest.split(',').collect()
    };

    let single = |params: &[&str]| -> Result<usize, IndicatorError> {
        parse_period(expect_params(&label, params, 1)?[0])
    };

    let kind = match label.as_str() {
        "sma" => IndicatorKind::Sma {
            period: single(&params)?,
        },
        "ema" => IndicatorKind::Ema {
            span: single(&params)?,
        },
        "rsi" => IndicatorKind::Rsi {
            period: single(&params)?,
        },
        "stoch_rsi" | "stochrsi" => IndicatorKind::StochRsi {
            period: single(&params)?,
        },
        "macd" => {
            let p = expect_params(&label, &params, 3)?;
            IndicatorKind::Macd {
                fast: parse_period(p[0])?,
                slow: parse_period(p[1])?,
                signal: parse_period(p[2])?,
            }
        }
        "adx" | "dmi" => IndicatorKind::Adx {
            period: single(&params)?,
        },
        "bb" | "bollinger" => {
            let p = expect_params(&label, &params, 2)?;
            IndicatorKind::Bollinger {
                period: parse_period(p[0])?,
                std_dev: parse_f64(p[1])?,
            }
        }
        "atr" => IndicatorKind::Atr {
            period: single(&params)?,
        },
        "vol_sma" | "volume_sma" => IndicatorKind::VolumeSma {
            period: single(&params)?,
        },
        "high" | "highest_high" => IndicatorKind::HighestHigh {
            period: single(&params)?,
        },
        _ => return Err(IndicatorError::UnknownKind(label)),
    };
    Ok(kind)
}

/// Parse a full `name=kind:params` request and validate it.
pub fn parse_request(spec: &str) -> Result<IndicatorRequest, IndicatorError> {
    let (name, kind) = spec
        .split_once('=')
        .ok_or_else(|| IndicatorError::MissingField("name".to_string()))?;
    let request = IndicatorRequest::new(name.trim(), parse_kind(kind)?);
    validate_request(&request)?;
    Ok(request)
}

pub fn parse_requests<S: AsRef<str>>(specs: &[S]) -> Result<Vec<IndicatorRequest>, IndicatorError> {
    specs.iter().map(|s| parse_request(s.as_ref())).collect()
}
