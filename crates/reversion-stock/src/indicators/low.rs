//! Proximity of the latest close to the trailing low

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StockError};
use crate::market::PriceSeries;

/// How far the latest close sits above the window's lowest low
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LowProximity {
    pub current_price: f64,
    pub week52_low: f64,
    pub week52_low_date: NaiveDate,
    /// `(current_price - week52_low) / week52_low`
    pub distance_pct: f64,
    pub is_near_low: bool,
    pub days_since_low: i64,
}

/// Compare the last close with the minimum of `low_prices`
///
/// `dates` is indexed in parallel with `low_prices`; ties on the minimum
/// resolve to the earliest index. `now` is the evaluation date used for
/// `days_since_low`.
pub fn check_low_proximity(
    close_prices: &[f64],
    low_prices: &[f64],
    dates: &[NaiveDate],
    tolerance: f64,
    now: NaiveDate,
) -> Result<LowProximity> {
    let Some(&current_price) = close_prices.last() else {
        return Err(StockError::EmptySeries("close prices"));
    };
    if low_prices.is_empty() {
        return Err(StockError::EmptySeries("low prices"));
    }
    if dates.len() < low_prices.len() {
        return Err(StockError::LengthMismatch {
            left: "low prices",
            left_len: low_prices.len(),
            right: "dates",
            right_len: dates.len(),
        });
    }

    let (low_index, week52_low) = low_prices
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, low)| low.is_finite())
        .fold(None, |best: Option<(usize, f64)>, (i, low)| match best {
            Some((_, min)) if low >= min => best,
            _ => Some((i, low)),
        })
        .ok_or_else(|| StockError::InvalidSeries("no finite low prices".to_string()))?;

    if week52_low <= 0.0 {
        return Err(StockError::InvalidParameter(format!(
            "52-week low must be positive, got {week52_low}"
        )));
    }

    let week52_low_date = dates[low_index];
    let distance_pct = (current_price - week52_low) / week52_low;

    Ok(LowProximity {
        current_price,
        week52_low,
        week52_low_date,
        distance_pct,
        is_near_low: distance_pct <= tolerance,
        days_since_low: (now - week52_low_date).num_days(),
    })
}

/// [`check_low_proximity`] over the columns of a validated series
pub fn check_series_low_proximity(
    series: &PriceSeries,
    tolerance: f64,
    now: NaiveDate,
) -> Result<LowProximity> {
    check_low_proximity(&series.closes(), &series.lows(), &series.dates(), tolerance, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn dates() -> Vec<NaiveDate> {
        vec![date(1, 1), date(2, 1), date(3, 1), date(4, 1)]
    }

    #[test]
    fn test_near_low() {
        let result = check_low_proximity(
            &[110.0, 105.0, 101.0, 101.0],
            &[108.0, 102.0, 100.0, 115.0],
            &dates(),
            0.05,
            date(4, 11),
        )
        .unwrap();

        assert_eq!(result.week52_low, 100.0);
        assert_eq!(result.week52_low_date, date(3, 1));
        assert!((result.distance_pct - 0.01).abs() < 1e-12);
        assert!(result.is_near_low);
        assert_eq!(result.days_since_low, 41);
    }

    #[test]
    fn test_far_from_low() {
        let result = check_low_proximity(
            &[110.0, 105.0, 101.0, 120.0],
            &[108.0, 102.0, 100.0, 115.0],
            &dates(),
            0.05,
            date(4, 1),
        )
        .unwrap();

        assert!((result.distance_pct - 0.20).abs() < 1e-12);
        assert!(!result.is_near_low);
        assert_eq!(result.days_since_low, 31);
    }

    #[test]
    fn test_first_occurrence_wins_ties() {
        let result = check_low_proximity(
            &[10.0, 10.0, 10.0, 10.0],
            &[9.0, 8.0, 8.0, 9.0],
            &dates(),
            0.05,
            date(4, 1),
        )
        .unwrap();
        assert_eq!(result.week52_low_date, date(2, 1));
    }

    #[test]
    fn test_empty_series() {
        let err = check_low_proximity(&[], &[1.0], &dates(), 0.05, date(4, 1)).unwrap_err();
        assert!(matches!(err, StockError::EmptySeries("close prices")));

        let err = check_low_proximity(&[1.0], &[], &dates(), 0.05, date(4, 1)).unwrap_err();
        assert!(matches!(err, StockError::EmptySeries("low prices")));
    }

    #[test]
    fn test_missing_dates() {
        let err = check_low_proximity(&[1.0, 2.0], &[1.0, 2.0], &[date(1, 1)], 0.05, date(4, 1))
            .unwrap_err();
        assert!(matches!(err, StockError::LengthMismatch { .. }));
    }

    #[test]
    fn test_zero_low_rejected() {
        let err = check_low_proximity(&[1.0], &[0.0], &[date(1, 1)], 0.05, date(4, 1))
            .unwrap_err();
        assert!(matches!(err, StockError::InvalidParameter(_)));
    }
}
