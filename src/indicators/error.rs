use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("invalid numeric format: '{0}'")]
    InvalidNumericFormat(String),
    #[error("missing field: {0}")]
    MissingField(String),
    #[error("unknown indicator kind: '{0}'")]
    UnknownKind(String),
    #[error("{kind} expects {expected} parameter(s), got {actual}")]
    ParameterCount {
        kind: String,
        expected: usize,
        actual: usize,
    },
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
    #[error("indicator output '{0}' is produced more than once")]
    DuplicateOutput(String),
    #[error("no indicator produces '{0}'")]
    UnknownOutput(String),
}
