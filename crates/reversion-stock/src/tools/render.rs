//! Tool for re-chunking arbitrary tool output as markdown

use async_trait::async_trait;
use reversion_tools::{Result as ToolResult, Tool, parse_params};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::config::ScreenerConfig;
use crate::render::{RenderMode, RenderOptions, render_structured_result};

/// Tool that normalizes a structured result into bounded markdown
pub struct RenderTool {
    config: Arc<ScreenerConfig>,
}

#[derive(Debug, Deserialize)]
struct RenderParams {
    structured: Value,
    #[serde(default)]
    mode: RenderMode,
    #[serde(default)]
    max_tokens: Option<usize>,
}

impl RenderTool {
    pub fn new(config: Arc<ScreenerConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Tool for RenderTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: RenderParams = parse_params(self.name(), params)?;
        let options = RenderOptions::new(
            params.mode,
            params.max_tokens.unwrap_or(self.config.render_max_tokens),
        );
        Ok(serde_json::to_value(render_structured_result(
            &params.structured,
            options,
        ))?)
    }

    fn name(&self) -> &str {
        "render_structured_result"
    }

    fn description(&self) -> &str {
        "Convert a structured tool result (MCP content blocks, result strings, snippet \
         lists or HTML) into a size-bounded markdown snippet or paragraph-aligned chunks."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "structured": {
                    "description": "Any JSON value returned by another tool"
                },
                "mode": {
                    "type": "string",
                    "enum": ["snippet", "chunked"],
                    "default": "snippet"
                },
                "max_tokens": {
                    "type": "integer",
                    "description": "Approximate token budget per snippet or chunk",
                    "default": self.config.render_max_tokens
                }
            },
            "required": ["structured"]
        })
    }
}
