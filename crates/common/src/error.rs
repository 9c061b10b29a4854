use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Total capital must be positive, got {0}")]
    NonPositiveCapital(f64),
    #[error("Invalid trading pair: {0:?}")]
    InvalidSymbol(String),
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
    #[error("Configuration invariant violated: {0}")]
    Invariant(String),
    #[error("Indicator rejected its parameters: {0}")]
    Indicator(String),
}
