//! Error types for tool execution

use thiserror::Error;

/// Result type alias for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type for tool dispatch and execution
#[derive(Error, Debug)]
pub enum ToolError {
    /// No tool registered under the requested name
    #[error("Unknown tool: {0}")]
    NotFound(String),

    /// Parameters did not match the tool's input schema
    #[error("Invalid parameters for {tool}: {reason}")]
    InvalidParameters {
        tool: String,
        reason: String,
    },

    /// The tool ran but could not produce a result
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    /// Output could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ToolError::InvalidParameters {
            tool: "compute_macd".to_string(),
            reason: "missing field `close_prices`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid parameters for compute_macd: missing field `close_prices`"
        );
        assert_eq!(ToolError::NotFound("x".into()).to_string(), "Unknown tool: x");
    }
}
