use crate::indicators::error::IndicatorError;
use crate::models::indicators::{IndicatorKind, IndicatorRequest};

pub fn validate_period(name: &str, period: usize) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter {
            name: name.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

pub fn validate_macd_periods(fast: usize, slow: usize, signal: usize) -> Result<(), IndicatorError> {
    validate_period("fast", fast)?;
    validate_period("slow", slow)?;
    validate_period("signal", signal)?;
    if fast >= slow {
        return Err(IndicatorError::InvalidParameter {
            name: "fast".to_string(),
            reason: format!("fast period {} must be below slow period {}", fast, slow),
        });
    }
    Ok(())
}

pub fn validate_std_dev(std_dev: f64) -> Result<(), IndicatorError> {
    if !std_dev.is_finite() || std_dev <= 0.0 {
        return Err(IndicatorError::InvalidParameter {
            name: "std_dev".to_string(),
            reason: format!("must be a positive number, got {}", std_dev),
        });
    }
    Ok(())
}

pub fn validate_kind(kind: &IndicatorKind) -> Result<(), IndicatorError> {
    match *kind {
        IndicatorKind::Sma { period }
        | IndicatorKind::Rsi { period }
        | IndicatorKind::StochRsi { period }
        | IndicatorKind::Adx { period }
        | IndicatorKind::Atr { period }
        | IndicatorKind::VolumeSma { period }
        | IndicatorKind::HighestHigh { period } => validate_period("period", period),
        IndicatorKind::Ema { span } => validate_period("span", span),
        IndicatorKind::Macd { fast, slow, signal } => validate_macd_periods(fast, slow, signal),
        IndicatorKind::Bollinger { period, std_dev } => {
            validate_period("period", period)?;
            validate_std_dev(std_dev)
        }
    }
}

pub fn validate_request(request: &IndicatorRequest) -> Result<(), IndicatorError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(IndicatorError::MissingField("name".to_string()));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(IndicatorError::InvalidParameter {
            name: "name".to_string(),
            reason: format!("'{}' may only contain letters, digits and '_'", name),
        });
    }
    validate_kind(&request.kind)
}
