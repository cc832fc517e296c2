//! Upstream data sources consumed as black boxes
//!
//! Market-data and filing providers live outside this crate. The service
//! layer talks to them through these traits; tests substitute mocks.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StockError};
use crate::evidence::FilingDocument;
use crate::market::PriceSeries;

/// Bar spacing for a history request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1wk")]
    Weekly,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
        }
    }
}

/// A price-history request: how far back and at what spacing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    /// Provider period string such as `1y` or `6mo`
    pub period: String,
    pub interval: Interval,
}

impl HistoryRequest {
    pub fn new(period: impl Into<String>, interval: Interval) -> Self {
        Self {
            period: period.into(),
            interval,
        }
    }

    /// One year of daily bars, the 52-week window
    pub fn one_year() -> Self {
        Self::new("1y", Interval::Daily)
    }
}

/// MACD timeframe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// Six months of daily bars
    #[default]
    Daily,
    /// Two years of weekly bars
    Weekly,
}

impl Timeframe {
    pub fn history_request(&self) -> HistoryRequest {
        match self {
            Self::Daily => HistoryRequest::new("6mo", Interval::Daily),
            Self::Weekly => HistoryRequest::new("2y", Interval::Weekly),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => f.write_str("daily"),
            Self::Weekly => f.write_str("weekly"),
        }
    }
}

impl FromStr for Timeframe {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "1d" => Ok(Self::Daily),
            "weekly" | "1wk" => Ok(Self::Weekly),
            other => Err(StockError::InvalidParameter(format!(
                "unknown timeframe '{other}', expected 'daily' or 'weekly'"
            ))),
        }
    }
}

/// A filing listing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingRequest {
    pub ticker: String,
    /// Form type such as `8-K`
    pub form: String,
    /// Most recent filings to return
    pub limit: usize,
    /// SEC contact identity to present upstream
    pub identity: Option<String>,
}

/// Source of OHLC history by ticker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    /// Bars for `ticker`, oldest first; an empty series means no data
    async fn history(&self, ticker: &str, request: &HistoryRequest) -> Result<PriceSeries>;
}

/// Source of filing documents with their text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FilingSource: Send + Sync {
    /// Most recent filings first, text included where available
    async fn filings(&self, request: &FilingRequest) -> Result<Vec<FilingDocument>>;
}

/// Source of listed option chains by ticker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OptionsSource: Send + Sync {
    /// Listed expiration dates, nearest first; empty when the ticker has no options
    async fn expirations(&self, ticker: &str) -> Result<Vec<NaiveDate>>;

    /// Number of call contracts listed for one expiration
    async fn call_count(&self, ticker: &str, expiration: NaiveDate) -> Result<usize>;
}

/// Listed-options summary for one ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsAvailability {
    pub expirations: usize,
    pub next_expiration: NaiveDate,
    /// Calls listed for `next_expiration`
    pub call_count: usize,
}
