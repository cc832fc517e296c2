//! Tool trait definition

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ToolError};

/// Name, description and input schema of a tool, as advertised to a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// A JSON-callable operation
///
/// The tool-routing layer sends `params` shaped by [`Tool::input_schema`]
/// and forwards the returned value into the model context.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with given parameters
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Unique name within a [`ToolRegistry`](crate::ToolRegistry)
    fn name(&self) -> &str;

    /// Tells the model when to call this tool
    fn description(&self) -> &str;

    /// JSON Schema of the accepted parameters
    fn input_schema(&self) -> Value;

    /// Bundle the advertised metadata
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Deserialize tool parameters, tagging failures with the tool name
pub fn parse_params<T: DeserializeOwned>(tool: &str, params: Value) -> Result<T> {
    serde_json::from_value(params).map_err(|e| ToolError::InvalidParameters {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}
