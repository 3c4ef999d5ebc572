use thiserror::Error;

/// Reasons a render sample is refused by the recorder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("sample has no component key")]
    MissingKey,
    #[error("sample field `{field}` is not a usable duration: {value}")]
    InvalidDuration { field: &'static str, value: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid number: {value:?}")]
    Unparsable { var: &'static str, value: String },
    #[error("{var} must be positive, got {value}")]
    NonPositive { var: &'static str, value: String },
}
