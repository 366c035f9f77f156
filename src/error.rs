//! Error types for rusty-trade

use thiserror::Error;

/// Main error type for rusty-trade
#[derive(Error, Debug)]
pub enum TradeError {
    #[error("Source unavailable: {source_id}: {reason}")]
    SourceUnavailable { source_id: String, reason: String },

    #[error("Malformed data: {0}")]
    MalformedData(String),

    #[error("Malformed amount '{value}': {reason}")]
    MalformedAmount { value: String, reason: String },

    #[error("Unknown currency: {currency} has no conversion to USD")]
    UnknownCurrency { currency: String },

    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl TradeError {
    /// Build a `SourceUnavailable` from anything that names the source
    pub fn unavailable(source_id: impl Into<String>, reason: impl ToString) -> Self {
        TradeError::SourceUnavailable {
            source_id: source_id.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for rusty-trade operations
pub type Result<T> = std::result::Result<T, TradeError>;
