//! Dollar-amount extraction from free text

use regex::Regex;
use std::sync::LazyLock;

/// `$` followed by a comma-grouped or plain number with optional decimals
static PRICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([0-9]{1,3}(?:,[0-9]{3})*(?:\.[0-9]+)?|[0-9]+(?:\.[0-9]+)?)")
        .expect("price pattern is a valid regex")
});

/// Values outside this open interval are treated as share counts, phone
/// numbers and similar noise
const MIN_PLAUSIBLE_PRICE: f64 = 0.0001;
const MAX_PLAUSIBLE_PRICE: f64 = 1_000_000.0;

/// Every plausible dollar price in `text`, left to right, duplicates kept
///
/// The comma-grouped alternative is tried first, so an ungrouped number of
/// four or more digits matches only its first three digits.
pub fn extract_price_candidates(text: &str) -> Vec<f64> {
    PRICE_PATTERN
        .captures_iter(text)
        .filter_map(|cap| cap.get(1)?.as_str().replace(',', "").parse::<f64>().ok())
        .filter(|&value| value > MIN_PLAUSIBLE_PRICE && value < MAX_PLAUSIBLE_PRICE)
        .collect()
}

/// First plausible dollar price in `text`
pub fn extract_price(text: &str) -> Option<f64> {
    extract_price_candidates(text).into_iter().next()
}
