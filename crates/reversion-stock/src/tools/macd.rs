//! Tool for computing MACD over a close series

use async_trait::async_trait;
use reversion_tools::{Result as ToolResult, Tool, parse_params};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::config::ScreenerConfig;
use crate::error::Result;
use crate::indicators::{MacdParams, compute_macd};

const RECENT_POINTS: usize = 10;

/// Tool for computing MACD line, signal line and histogram
pub struct MacdTool {
    config: Arc<ScreenerConfig>,
}

#[derive(Debug, Deserialize)]
struct MacdToolParams {
    close_prices: Vec<f64>,
    #[serde(default)]
    short_period: Option<usize>,
    #[serde(default)]
    long_period: Option<usize>,
    #[serde(default)]
    signal_period: Option<usize>,
    #[serde(default)]
    require_full_window: Option<bool>,
}

impl MacdTool {
    pub fn new(config: Arc<ScreenerConfig>) -> Self {
        Self { config }
    }

    fn calculate(&self, params: MacdToolParams) -> Result<Value> {
        let defaults = self.config.macd;
        let spans = MacdParams {
            short_period: params.short_period.unwrap_or(defaults.short_period),
            long_period: params.long_period.unwrap_or(defaults.long_period),
            signal_period: params.signal_period.unwrap_or(defaults.signal_period),
            require_full_window: params
                .require_full_window
                .unwrap_or(defaults.require_full_window),
        };

        let series = compute_macd(&params.close_prices, spans)?;
        let points = series.points();

        Ok(json!({
            "params": series.params(),
            "summary": series.summary(),
            "data_points": points.len(),
            "recent_values": &points[points.len().saturating_sub(RECENT_POINTS)..],
        }))
    }
}

#[async_trait]
impl Tool for MacdTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: MacdToolParams = parse_params(self.name(), params)?;
        Ok(self.calculate(params)?)
    }

    fn name(&self) -> &str {
        "compute_macd"
    }

    fn description(&self) -> &str {
        "Compute MACD (fast EMA minus slow EMA), its signal line and histogram from \
         closing prices, oldest first. Returns the final-bar summary with position \
         relative to zero and crossover direction."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "close_prices": {
                    "type": "array",
                    "items": { "type": "number" },
                    "description": "Closing prices in chronological order"
                },
                "short_period": {
                    "type": "integer",
                    "description": "Fast EMA span",
                    "default": self.config.macd.short_period
                },
                "long_period": {
                    "type": "integer",
                    "description": "Slow EMA span",
                    "default": self.config.macd.long_period
                },
                "signal_period": {
                    "type": "integer",
                    "description": "Signal EMA span",
                    "default": self.config.macd.signal_period
                },
                "require_full_window": {
                    "type": "boolean",
                    "description": "Fail instead of returning un-warmed values for short series",
                    "default": self.config.macd.require_full_window
                }
            },
            "required": ["close_prices"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reversion_tools::ToolError;

    fn tool() -> MacdTool {
        MacdTool::new(Arc::new(ScreenerConfig::default()))
    }

    #[tokio::test]
    async fn test_execute_summary() {
        let output = tool()
            .execute(json!({ "close_prices": [100.0, 102.0, 101.5, 103.0, 105.0, 104.0] }))
            .await
            .unwrap();

        let summary = &output["summary"];
        assert_eq!(summary["position"], "above_zero");
        assert_eq!(summary["crossover"], "bullish");
        assert_eq!(summary["warmed_up"], false);
        assert!((summary["macd_line"].as_f64().unwrap() - 0.8674102559993884).abs() < 1e-9);
        assert_eq!(output["data_points"], 6);
        assert_eq!(output["params"]["long_period"], 26);
        assert_eq!(output["recent_values"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_require_full_window_fails() {
        let err = tool()
            .execute(json!({ "close_prices": [1.0, 2.0], "require_full_window": true }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed(msg) if msg.contains("Insufficient data")));
    }

    #[tokio::test]
    async fn test_missing_prices_is_invalid() {
        let err = tool().execute(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameters { .. }));
    }

    #[test]
    fn test_tool_metadata() {
        let tool = tool();
        assert_eq!(tool.name(), "compute_macd");
        let schema = tool.input_schema();
        assert_eq!(schema["properties"]["long_period"]["default"], 26);
        assert_eq!(schema["required"][0], "close_prices");
    }
}
