//! Error types for the numeric screening path
//!
//! Only the indicator engine and the caller-level service fail with these.
//! Evidence extraction and markdown rendering never error; they degrade to
//! skipped items or placeholder output instead.

use thiserror::Error;

/// Stock screening specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// A required series had no values
    #[error("Empty series: {0}")]
    EmptySeries(&'static str),

    /// Not enough data points to compute an indicator
    #[error("Insufficient data: need at least {required} values, got {actual}")]
    InsufficientData {
        required: usize,
        actual: usize,
    },

    /// An indicator parameter was out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Parallel series had different lengths
    #[error("Length mismatch: {left} has {left_len} values, {right} has {right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    /// A price series violated ordering or value invariants
    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        symbol: String,
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

/// Convert StockError to a tool execution failure
impl From<StockError> for reversion_tools::ToolError {
    fn from(err: StockError) -> Self {
        reversion_tools::ToolError::ExecutionFailed(err.to_string())
    }
}
