//! Tool for pulling dollar amounts out of free text

use async_trait::async_trait;
use reversion_tools::{Result as ToolResult, Tool, parse_params};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::evidence::extract_price_candidates;

/// Tool listing every plausible `$` price in a text, left to right
pub struct PriceExtractionTool;

#[derive(Debug, Deserialize)]
struct PriceParams {
    text: String,
}

#[async_trait]
impl Tool for PriceExtractionTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: PriceParams = parse_params(self.name(), params)?;
        let candidates = extract_price_candidates(&params.text);
        Ok(json!({
            "first": candidates.first(),
            "candidates": candidates,
        }))
    }

    fn name(&self) -> &str {
        "extract_price_candidates"
    }

    fn description(&self) -> &str {
        "Extract dollar-denominated amounts (e.g. conversion prices) from filing text. \
         Values outside (0.0001, 1,000,000) are dropped; duplicates are kept."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Free text such as a filing snippet"
                }
            },
            "required": ["text"]
        })
    }
}
