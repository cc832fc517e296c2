//! Evidence extractor: keyword-triggered text mining over filing documents
//!
//! Documents arrive already fetched. Every function here is best-effort: a
//! document that cannot be dated, has no text, or has no keyword hit is
//! dropped from the output and recorded as skipped, never reported as an
//! error.

pub mod conversion;
pub mod filing;
pub mod price;

pub use conversion::{
    ConversionCandidate, ConversionScan, DEFAULT_CONVERSION_KEYWORDS, ExtractorConfig,
    SNIPPET_WINDOW_CHARS, SkipReason, SkippedFiling, find_conversion_candidates, keyword_window,
    scan_filing_values, scan_filings,
};
pub use filing::{
    DAYS_PER_MONTH, FilingDate, FilingDocument, accession_hint, decode_filings, lookback_cutoff,
    parse_date_text, select_recent_filings,
};
pub use price::{extract_price, extract_price_candidates};
