//! Tool for summarizing a price series against its 52-week extremes

use async_trait::async_trait;
use reversion_tools::{Result as ToolResult, Tool, parse_params};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::indicators::summarize_price_range;
use crate::market::PriceSeries;

/// Tool reporting current price, 52-week high/low and distances to both
pub struct PriceRangeTool;

#[derive(Debug, Deserialize)]
struct RangeParams {
    bars: PriceSeries,
}

#[async_trait]
impl Tool for PriceRangeTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: RangeParams = parse_params(self.name(), params)?;
        let range = summarize_price_range(&params.bars)?;
        Ok(json!({
            "data_points": params.bars.len(),
            "range": range,
        }))
    }

    fn name(&self) -> &str {
        "stock_range_summary"
    }

    fn description(&self) -> &str {
        "Summarize one year of daily bars: current close, 52-week high and low, and \
         fractional distance from each."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "bars": {
                    "type": "array",
                    "description": "OHLC bars with strictly increasing dates",
                    "items": {
                        "type": "object",
                        "properties": {
                            "date": { "type": "string", "format": "date" },
                            "open": { "type": "number" },
                            "high": { "type": "number" },
                            "low": { "type": "number" },
                            "close": { "type": "number" }
                        },
                        "required": ["date", "open", "high", "low", "close"]
                    }
                }
            },
            "required": ["bars"]
        })
    }
}
