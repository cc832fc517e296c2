//! 52-week range summary

use serde::{Deserialize, Serialize};

use crate::error::{Result, StockError};
use crate::market::PriceSeries;

/// Latest close against the window's extremes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub current_price: f64,
    pub week52_high: f64,
    pub week52_low: f64,
    /// `(current - low) / low`
    pub distance_from_low: f64,
    /// `(high - current) / high`
    pub distance_from_high: f64,
}

/// Summarize a series as current price versus its high and low
pub fn summarize_price_range(series: &PriceSeries) -> Result<PriceRange> {
    let last = series.last().ok_or(StockError::EmptySeries("price history"))?;

    let week52_high = series.highs().into_iter().fold(f64::NEG_INFINITY, f64::max);
    let week52_low = series.lows().into_iter().fold(f64::INFINITY, f64::min);

    if !(week52_low.is_finite() && week52_low > 0.0 && week52_high.is_finite()) {
        return Err(StockError::InvalidSeries(
            "high/low columns must hold positive finite prices".to_string(),
        ));
    }

    Ok(PriceRange {
        current_price: last.close,
        week52_high,
        week52_low,
        distance_from_low: (last.close - week52_low) / week52_low,
        distance_from_high: (week52_high - last.close) / week52_high,
    })
}
