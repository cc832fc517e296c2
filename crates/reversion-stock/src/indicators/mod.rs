//! Indicator engine: pure numeric transforms over price series
//!
//! Nothing here performs I/O or keeps state between calls. Empty input is a
//! hard error on this path; callers turn it into a diagnostic line.

pub mod low;
pub mod macd;
pub mod range;

pub use low::{LowProximity, check_low_proximity, check_series_low_proximity};
pub use macd::{
    Crossover, MacdParams, MacdPoint, MacdPosition, MacdSeries, MacdSummary, compute_macd,
};
pub use range::{PriceRange, summarize_price_range};
