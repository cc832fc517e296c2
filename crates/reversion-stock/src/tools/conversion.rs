//! Tool for scanning filings for debt-conversion language

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reversion_tools::{Result as ToolResult, Tool, parse_params};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::config::ScreenerConfig;
use crate::evidence::{extract_price, lookback_cutoff, scan_filing_values};

/// Tool returning conversion candidates plus the filings it skipped
pub struct ConversionSearchTool {
    config: Arc<ScreenerConfig>,
}

#[derive(Debug, Deserialize)]
struct ConversionParams {
    /// Raw records, decoded one by one so a bad record only skips itself
    documents: Vec<Value>,
    /// Explicit cutoff; overrides `months_back`
    #[serde(default)]
    cutoff: Option<NaiveDate>,
    #[serde(default)]
    months_back: Option<u32>,
    #[serde(default)]
    as_of: Option<NaiveDate>,
    #[serde(default)]
    keywords: Option<Vec<String>>,
}

impl ConversionSearchTool {
    pub fn new(config: Arc<ScreenerConfig>) -> Self {
        Self { config }
    }

    fn search(&self, params: ConversionParams) -> Value {
        let cutoff = params.cutoff.unwrap_or_else(|| {
            let as_of = params.as_of.unwrap_or_else(|| Utc::now().date_naive());
            lookback_cutoff(as_of, params.months_back.unwrap_or(self.config.months_back))
        });

        let mut extractor = self.config.extractor.clone();
        if let Some(keywords) = params.keywords.filter(|k| !k.is_empty()) {
            extractor.keywords = keywords;
        }

        let scan = scan_filing_values(&params.documents, cutoff, &extractor);
        let candidates: Vec<Value> = scan
            .candidates
            .iter()
            .map(|candidate| {
                json!({
                    "filing_date": candidate.filing_date,
                    "accession_id": candidate.accession_id,
                    "source_url": candidate.source_url,
                    "snippet": candidate.snippet,
                    "price_hint": extract_price(&candidate.snippet),
                })
            })
            .collect();

        json!({
            "cutoff": cutoff,
            "scanned": params.documents.len(),
            "candidates": candidates,
            "skipped": scan.skipped,
        })
    }
}

#[async_trait]
impl Tool for ConversionSearchTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: ConversionParams = parse_params(self.name(), params)?;
        Ok(self.search(params))
    }

    fn name(&self) -> &str {
        "find_conversion_candidates"
    }

    fn description(&self) -> &str {
        "Scan already-fetched filing documents for debt-conversion keywords and return \
         a text window around the earliest hit in each recent filing, with the first \
         dollar amount in that window as a price hint."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "documents": {
                    "type": "array",
                    "description": "Filings with filing_date, accession_id, source_url and raw_text",
                    "items": { "type": "object" }
                },
                "cutoff": {
                    "type": "string",
                    "format": "date",
                    "description": "Ignore filings dated before this day"
                },
                "months_back": {
                    "type": "integer",
                    "description": "Lookback in 30-day months when no cutoff is given",
                    "default": self.config.months_back
                },
                "as_of": {
                    "type": "string",
                    "format": "date",
                    "description": "End of the lookback window (defaults to today)"
                },
                "keywords": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Replacement keyword list"
                }
            },
            "required": ["documents"]
        })
    }
}
