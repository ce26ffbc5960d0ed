use thiserror::Error;

#[derive(Error, Debug)]
pub enum EarnError {
    #[error("Hourly rate must be greater than zero to start (got {0})")]
    NonPositiveRate(f64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("State error: {0}")]
    StateError(String),

    #[error("No saved session found")]
    NoSession,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EarnError>;
