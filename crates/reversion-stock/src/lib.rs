//! Mean-reversion screening toolkit
//!
//! Surfaces equities trading near their 52-week lows that recently filed
//! debt-conversion events. The crate has three independent engines and two
//! caller-level layers on top of them:
//!
//! - [`indicators`]: MACD, 52-week-low proximity and range summary
//! - [`evidence`]: conversion-keyword scanning and dollar-price extraction
//!   over already-fetched filing documents
//! - [`render`]: markdown snippet/chunk rendering of arbitrary tool output
//! - [`analyzer`]: [`ReversionAnalyzer`], which fetches through the
//!   [`source`] traits and formats plain-text [`report`]s
//! - [`tools`]: JSON [`Tool`](reversion_tools::Tool) adapters for an LLM
//!   tool-routing layer
//!
//! # Example
//!
//! ```rust,ignore
//! use reversion_stock::{MacdParams, compute_macd};
//!
//! let closes = [100.0, 102.0, 101.5, 103.0, 105.0, 104.0];
//! let macd = compute_macd(&closes, MacdParams::default())?;
//! println!("{}", macd.summary().crossover);
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod evidence;
pub mod indicators;
pub mod market;
pub mod render;
pub mod report;
pub mod source;
pub mod tools;

pub use analyzer::ReversionAnalyzer;
pub use config::ScreenerConfig;
pub use error::{Result, StockError};
pub use evidence::{
    ConversionCandidate, ConversionScan, ExtractorConfig, FilingDate, FilingDocument,
    extract_price_candidates, find_conversion_candidates, scan_filing_values, scan_filings,
};
pub use indicators::{
    LowProximity, MacdParams, MacdSeries, MacdSummary, PriceRange, check_low_proximity,
    compute_macd, summarize_price_range,
};
pub use market::{PriceBar, PriceSeries};
pub use render::{RenderMode, RenderOptions, RenderedMarkdown, render_structured_result};
pub use source::{
    FilingRequest, FilingSource, HistoryRequest, OptionsAvailability, OptionsSource,
    PriceHistorySource, Timeframe,
};
pub use tools::register_tools;
