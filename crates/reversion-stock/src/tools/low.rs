//! Tool for checking proximity to the 52-week low

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reversion_tools::{Result as ToolResult, Tool, parse_params};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::config::ScreenerConfig;
use crate::error::Result;
use crate::indicators::check_low_proximity;

/// Tool for checking whether the latest close sits near the window low
pub struct LowProximityTool {
    config: Arc<ScreenerConfig>,
}

#[derive(Debug, Deserialize)]
struct LowParams {
    close_prices: Vec<f64>,
    low_prices: Vec<f64>,
    dates: Vec<NaiveDate>,
    #[serde(default)]
    tolerance: Option<f64>,
    /// Reference date for `days_since_low`; today (UTC) when absent
    #[serde(default)]
    as_of: Option<NaiveDate>,
}

impl LowProximityTool {
    pub fn new(config: Arc<ScreenerConfig>) -> Self {
        Self { config }
    }

    fn check(&self, params: LowParams) -> Result<Value> {
        let tolerance = params.tolerance.unwrap_or(self.config.low_tolerance);
        let as_of = params.as_of.unwrap_or_else(|| Utc::now().date_naive());

        let proximity = check_low_proximity(
            &params.close_prices,
            &params.low_prices,
            &params.dates,
            tolerance,
            as_of,
        )?;

        Ok(json!({
            "tolerance": tolerance,
            "as_of": as_of,
            "result": proximity,
        }))
    }
}

#[async_trait]
impl Tool for LowProximityTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: LowParams = parse_params(self.name(), params)?;
        Ok(self.check(params)?)
    }

    fn name(&self) -> &str {
        "check_52week_low"
    }

    fn description(&self) -> &str {
        "Check whether the latest close is within a tolerance of the lowest low in the \
         series. Returns the low, its date, the fractional distance and days since the low."
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
                "low_prices": {
                    "type": "array",
                    "items": { "type": "number" },
                    "description": "Intraday lows aligned with close_prices"
                },
                "dates": {
                    "type": "array",
                    "items": { "type": "string", "format": "date" },
                    "description": "Bar dates (YYYY-MM-DD) aligned with low_prices"
                },
                "tolerance": {
                    "type": "number",
                    "description": "Maximum distance above the low as a fraction",
                    "default": self.config.low_tolerance
                },
                "as_of": {
                    "type": "string",
                    "format": "date",
                    "description": "Date to count days since the low from (defaults to today)"
                }
            },
            "required": ["close_prices", "low_prices", "dates"]
        })
    }
}
