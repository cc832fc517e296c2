//! Price history types shared by the indicator engine and its callers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StockError};

/// One OHLC bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Session date of the bar
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    /// Create a bar
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self { date, open, high, low, close }
    }
}

/// A validated, strictly date-ordered sequence of bars
///
/// Dates are strictly increasing and every close is finite. The series is
/// immutable once built; indicator functions borrow its columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceBar>", into = "Vec<PriceBar>")]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Validate and wrap a list of bars
    pub fn new(bars: Vec<PriceBar>) -> Result<Self> {
        for (i, bar) in bars.iter().enumerate() {
            if !bar.close.is_finite() {
                return Err(StockError::InvalidSeries(format!(
                    "close on {} is not a finite number",
                    bar.date
                )));
            }
            if i > 0 && bars[i - 1].date >= bar.date {
                return Err(StockError::InvalidSeries(format!(
                    "bars out of order or duplicated at {}",
                    bar.date
                )));
            }
        }
        Ok(Self { bars })
    }

    /// All bars, oldest first
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar
    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Closing prices, oldest first
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Session lows, oldest first
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Session highs, oldest first
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// Bar dates, oldest first
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }
}

impl TryFrom<Vec<PriceBar>> for PriceSeries {
    type Error = StockError;

    fn try_from(bars: Vec<PriceBar>) -> Result<Self> {
        Self::new(bars)
    }
}

impl From<PriceSeries> for Vec<PriceBar> {
    fn from(series: PriceSeries) -> Self {
        series.bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_series_columns() {
        let series = PriceSeries::new(vec![
            PriceBar::new(day(2), 10.0, 11.0, 9.5, 10.5),
            PriceBar::new(day(3), 10.5, 12.0, 10.0, 11.5),
        ])
        .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![10.5, 11.5]);
        assert_eq!(series.lows(), vec![9.5, 10.0]);
        assert_eq!(series.highs(), vec![11.0, 12.0]);
        assert_eq!(series.last().map(|b| b.date), Some(day(3)));
    }

    #[test]
    fn test_rejects_duplicate_dates() {
        let result = PriceSeries::new(vec![
            PriceBar::new(day(2), 1.0, 1.0, 1.0, 1.0),
            PriceBar::new(day(2), 1.0, 1.0, 1.0, 1.0),
        ]);
        assert!(matches!(result, Err(StockError::InvalidSeries(_))));
    }

    #[test]
    fn test_rejects_non_finite_close() {
        let result = PriceSeries::new(vec![PriceBar::new(day(2), 1.0, 1.0, 1.0, f64::NAN)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: PriceSeries = serde_json::from_str(
            r#"[{"date":"2024-01-02","open":1,"high":2,"low":0.5,"close":1.5}]"#,
        )
        .unwrap();
        assert_eq!(ok.closes(), vec![1.5]);

        let bad = serde_json::from_str::<PriceSeries>(
            r#"[{"date":"2024-01-03","open":1,"high":2,"low":0.5,"close":1.5},
                {"date":"2024-01-02","open":1,"high":2,"low":0.5,"close":1.5}]"#,
        );
        assert!(bad.is_err());
    }
}
