//! Moving average convergence divergence

use serde::{Deserialize, Serialize};
use std::fmt;
use ta::{Next, indicators::ExponentialMovingAverage};
use tracing::warn;

use crate::error::{Result, StockError};

/// MACD spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    /// Fast EMA span
    pub short_period: usize,
    /// Slow EMA span
    pub long_period: usize,
    /// Span of the EMA applied to the MACD line
    pub signal_period: usize,
    /// Reject series shorter than `long_period` instead of returning an
    /// un-warmed result
    #[serde(default)]
    pub require_full_window: bool,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            short_period: 12,
            long_period: 26,
            signal_period: 9,
            require_full_window: false,
        }
    }
}

impl MacdParams {
    /// Spans with the permissive short-input behaviour
    pub fn new(short_period: usize, long_period: usize, signal_period: usize) -> Self {
        Self {
            short_period,
            long_period,
            signal_period,
            require_full_window: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("short_period", self.short_period),
            ("long_period", self.long_period),
            ("signal_period", self.signal_period),
        ] {
            if value == 0 {
                return Err(StockError::InvalidParameter(format!(
                    "{name} must be greater than 0"
                )));
            }
        }
        Ok(())
    }
}

/// MACD values for one bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub macd_line: f64,
    pub signal_line: f64,
    pub histogram: f64,
}

/// Side of the zero line the MACD sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdPosition {
    AboveZero,
    BelowZero,
}

impl fmt::Display for MacdPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AboveZero => f.write_str("above zero"),
            Self::BelowZero => f.write_str("below zero"),
        }
    }
}

/// Sign of the histogram, read as a crossover signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crossover {
    Bullish,
    Bearish,
}

impl fmt::Display for Crossover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bullish => f.write_str("bullish"),
            Self::Bearish => f.write_str("bearish"),
        }
    }
}

/// Final-bar view of a MACD series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdSummary {
    pub current_price: f64,
    pub macd_line: f64,
    pub signal_line: f64,
    pub histogram: f64,
    pub position: MacdPosition,
    pub crossover: Crossover,
    /// False when the input was shorter than the slow span
    pub warmed_up: bool,
}

/// Per-bar MACD values aligned with the input closes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    params: MacdParams,
    points: Vec<MacdPoint>,
    last_close: f64,
}

impl MacdSeries {
    pub fn params(&self) -> MacdParams {
        self.params
    }

    /// One point per input close, oldest first
    pub fn points(&self) -> &[MacdPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: construction rejects empty input
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the series covered at least one full slow span
    pub fn is_warmed_up(&self) -> bool {
        self.points.len() >= self.params.long_period
    }

    /// Summarize the last bar
    pub fn summary(&self) -> MacdSummary {
        let last = self.points.last().copied().unwrap_or(MacdPoint {
            macd_line: 0.0,
            signal_line: 0.0,
            histogram: 0.0,
        });

        MacdSummary {
            current_price: self.last_close,
            macd_line: last.macd_line,
            signal_line: last.signal_line,
            histogram: last.histogram,
            position: if last.macd_line >= 0.0 {
                MacdPosition::AboveZero
            } else {
                MacdPosition::BelowZero
            },
            crossover: if last.histogram > 0.0 {
                Crossover::Bullish
            } else {
                Crossover::Bearish
            },
            warmed_up: self.is_warmed_up(),
        }
    }
}

fn ema(period: usize) -> Result<ExponentialMovingAverage> {
    ExponentialMovingAverage::new(period)
        .map_err(|e| StockError::InvalidParameter(format!("EMA period {period}: {e}")))
}

/// Compute MACD line, signal line and histogram for every close
///
/// Each EMA is seeded with its first input and then follows
/// `ema = a * x + (1 - a) * ema` with `a = 2 / (span + 1)`, so inputs
/// shorter than the slow span still produce values.
pub fn compute_macd(close_prices: &[f64], params: MacdParams) -> Result<MacdSeries> {
    params.validate()?;

    let Some(&last_close) = close_prices.last() else {
        return Err(StockError::InsufficientData {
            required: 1,
            actual: 0,
        });
    };

    if close_prices.len() < params.long_period {
        if params.require_full_window {
            return Err(StockError::InsufficientData {
                required: params.long_period,
                actual: close_prices.len(),
            });
        }
        warn!(
            bars = close_prices.len(),
            long_period = params.long_period,
            "MACD computed over fewer bars than the slow span"
        );
    }

    let mut short = ema(params.short_period)?;
    let mut long = ema(params.long_period)?;
    let mut signal = ema(params.signal_period)?;

    let points = close_prices
        .iter()
        .map(|&close| {
            let macd_line = short.next(close) - long.next(close);
            let signal_line = signal.next(macd_line);
            MacdPoint {
                macd_line,
                signal_line,
                histogram: macd_line - signal_line,
            }
        })
        .collect();

    Ok(MacdSeries {
        params,
        points,
        last_close,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        let closes = [100.0, 102.0, 101.5, 103.0, 105.0, 104.0];
        let series = compute_macd(&closes, MacdParams::default()).unwrap();
        let summary = series.summary();

        assert!((summary.macd_line - 0.867_410_255_999_388_4).abs() < 1e-9);
        assert!((summary.signal_line - 0.381_401_273_679_313_5).abs() < 1e-9);
        assert!((summary.histogram - 0.486_008_982_320_074_8).abs() < 1e-9);
        assert_eq!(summary.current_price, 104.0);
        assert_eq!(summary.position, MacdPosition::AboveZero);
        assert_eq!(summary.crossover, Crossover::Bullish);
        assert!(!summary.warmed_up);
    }

    #[test]
    fn test_declining_series_is_bearish() {
        let closes: Vec<f64> = (0..40).map(|i| 10.0 - f64::from(i) * 0.1).collect();
        let summary = compute_macd(&closes, MacdParams::default()).unwrap().summary();

        assert!((summary.macd_line - -0.638_672_731_758_982_9).abs() < 1e-9);
        assert!((summary.histogram - -0.027_217_157_697_062_01).abs() < 1e-9);
        assert_eq!(summary.position, MacdPosition::BelowZero);
        assert_eq!(summary.crossover, Crossover::Bearish);
        assert!(summary.warmed_up);
    }

    #[test]
    fn test_length_and_histogram_identity() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 50.0 + (f64::from(i) * 0.7).sin() * 3.0)
            .collect();
        let series = compute_macd(&closes, MacdParams::default()).unwrap();

        assert_eq!(series.len(), closes.len());
        for point in series.points() {
            assert_eq!(point.histogram, point.macd_line - point.signal_line);
        }
    }

    #[test]
    fn test_constant_series_is_flat() {
        let closes = vec![42.0; 100];
        let series = compute_macd(&closes, MacdParams::default()).unwrap();
        let last = series.points().last().unwrap();
        assert!(last.macd_line.abs() < 1e-12);
        assert!(last.histogram.abs() < 1e-12);
    }

    #[test]
    fn test_single_value_is_degenerate() {
        let series = compute_macd(&[7.5], MacdParams::default()).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.points()[0].macd_line, 0.0);
        let summary = series.summary();
        assert_eq!(summary.position, MacdPosition::AboveZero);
        assert_eq!(summary.crossover, Crossover::Bearish);
    }

    #[test]
    fn test_empty_input_errors() {
        let result = compute_macd(&[], MacdParams::default());
        assert!(matches!(result, Err(StockError::InsufficientData { actual: 0, .. })));
    }

    #[test]
    fn test_require_full_window() {
        let params = MacdParams {
            require_full_window: true,
            ..MacdParams::default()
        };
        let result = compute_macd(&[1.0, 2.0, 3.0], params);
        assert!(matches!(
            result,
            Err(StockError::InsufficientData { required: 26, actual: 3 })
        ));
    }

    #[test]
    fn test_zero_period_rejected() {
        let result = compute_macd(&[1.0, 2.0], MacdParams::new(0, 26, 9));
        assert!(matches!(result, Err(StockError::InvalidParameter(_))));
    }

    #[test]
    fn test_labels() {
        assert_eq!(MacdPosition::BelowZero.to_string(), "below zero");
        assert_eq!(Crossover::Bullish.to_string(), "bullish");
    }
}
