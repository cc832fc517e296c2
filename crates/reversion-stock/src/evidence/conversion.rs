//! Debt-conversion candidate search over filing text

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

use super::filing::{FilingDocument, accession_hint};

/// Characters kept on each side of the earliest keyword hit
pub const SNIPPET_WINDOW_CHARS: usize = 500;

/// Phrases that flag a filing as a possible conversion event
pub const DEFAULT_CONVERSION_KEYWORDS: [&str; 5] = [
    "conversion",
    "convertible",
    "debt conversion",
    "note conversion",
    "debenture",
];

/// Explicit configuration for a conversion search
///
/// `identity` is the SEC contact string the caller sends with filing
/// requests; the scan itself only carries it through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    pub keywords: Vec<String>,
    pub window_chars: usize,
    #[serde(default)]
    pub identity: Option<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_CONVERSION_KEYWORDS.iter().map(ToString::to_string).collect(),
            window_chars: SNIPPET_WINDOW_CHARS,
            identity: None,
        }
    }
}

/// A filing suspected of describing a conversion event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionCandidate {
    pub filing_date: NaiveDate,
    pub accession_id: Option<String>,
    pub source_url: Option<String>,
    /// Fixed window of text around the earliest keyword hit
    pub snippet: String,
}

/// Why a document produced no candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnparseableDate,
    BeforeCutoff,
    MissingText,
    NoKeywordHit,
    /// The raw record did not decode as a filing
    Malformed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::UnparseableDate => "no parseable filing date",
            Self::BeforeCutoff => "filed before cutoff",
            Self::MissingText => "no filing text",
            Self::NoKeywordHit => "no conversion keyword",
            Self::Malformed => "malformed filing record",
        };
        f.write_str(reason)
    }
}

/// A document dropped from the results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFiling {
    /// Position in the input collection
    pub index: usize,
    pub accession_id: Option<String>,
    pub reason: SkipReason,
}

/// Candidates in input order plus every skipped document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionScan {
    pub candidates: Vec<ConversionCandidate>,
    pub skipped: Vec<SkippedFiling>,
}

/// Scan documents filed on or after `cutoff` for conversion keywords
///
/// One candidate per matching document, in input order. Documents without a
/// usable date or text, filed before the cutoff, or without any keyword hit
/// land in [`ConversionScan::skipped`].
pub fn scan_filings(
    documents: &[FilingDocument],
    cutoff: NaiveDate,
    config: &ExtractorConfig,
) -> ConversionScan {
    scan_entries(documents.iter().map(|doc| Ok(Cow::Borrowed(doc))), cutoff, config)
}

/// [`scan_filings`] over raw provider records
///
/// Each record is decoded on its own. One that does not decode is skipped
/// as [`SkipReason::Malformed`] and the rest of the batch is still scanned.
pub fn scan_filing_values(
    records: &[Value],
    cutoff: NaiveDate,
    config: &ExtractorConfig,
) -> ConversionScan {
    let entries = records.iter().map(|record| {
        FilingDocument::from_value(record)
            .map(Cow::Owned)
            .ok_or_else(|| accession_hint(record))
    });
    scan_entries(entries, cutoff, config)
}

/// A decoded document, or the accession hint of a record that did not decode
type Entry<'a> = Result<Cow<'a, FilingDocument>, Option<String>>;

fn scan_entries<'a>(
    entries: impl Iterator<Item = Entry<'a>>,
    cutoff: NaiveDate,
    config: &ExtractorConfig,
) -> ConversionScan {
    let keywords: Vec<String> = config
        .keywords
        .iter()
        .map(|k| fold_case(k))
        .filter(|k| !k.is_empty())
        .collect();

    let mut scan = ConversionScan::default();
    for (index, entry) in entries.enumerate() {
        let outcome = match &entry {
            Ok(doc) => examine(doc, cutoff, &keywords, config.window_chars),
            Err(_) => Err(SkipReason::Malformed),
        };
        match outcome {
            Ok(candidate) => scan.candidates.push(candidate),
            Err(reason) => {
                let accession_id = match entry {
                    Ok(doc) => doc.accession_id.clone(),
                    Err(hint) => hint,
                };
                debug!(
                    index,
                    accession = accession_id.as_deref().unwrap_or("unknown"),
                    %reason,
                    "skipping filing"
                );
                scan.skipped.push(SkippedFiling {
                    index,
                    accession_id,
                    reason,
                });
            }
        }
    }

    debug!(
        candidates = scan.candidates.len(),
        skipped = scan.skipped.len(),
        "conversion scan complete"
    );
    scan
}

/// Candidates only; see [`scan_filings`]
pub fn find_conversion_candidates(
    documents: &[FilingDocument],
    cutoff: NaiveDate,
    config: &ExtractorConfig,
) -> Vec<ConversionCandidate> {
    scan_filings(documents, cutoff, config).candidates
}

fn examine(
    doc: &FilingDocument,
    cutoff: NaiveDate,
    keywords: &[String],
    window: usize,
) -> Result<ConversionCandidate, SkipReason> {
    let filing_date = doc.filing_date.resolve().ok_or(SkipReason::UnparseableDate)?;
    if filing_date < cutoff {
        return Err(SkipReason::BeforeCutoff);
    }
    let text = doc
        .raw_text
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(SkipReason::MissingText)?;
    let snippet = keyword_window(text, keywords, window).ok_or(SkipReason::NoKeywordHit)?;

    Ok(ConversionCandidate {
        filing_date,
        accession_id: doc.accession_id.clone(),
        source_url: doc.source_url.clone(),
        snippet,
    })
}

/// Text within `window` characters of the earliest case-insensitive match of
/// any keyword, or `None` when nothing matches
///
/// The window is symmetric and clamped to the text, with no attempt to
/// align on sentence boundaries.
pub fn keyword_window<S: AsRef<str>>(text: &str, keywords: &[S], window: usize) -> Option<String> {
    let folded = fold_case(text);
    let byte_offset = keywords
        .iter()
        .map(|k| fold_case(k.as_ref()))
        .filter(|k| !k.is_empty())
        .filter_map(|k| folded.find(&k))
        .min()?;

    // fold_case maps chars one-to-one, so char positions line up with `text`
    let char_offset = folded[..byte_offset].chars().count();
    let start = char_offset.saturating_sub(window);
    let end = char_offset.saturating_add(window);
    Some(text.chars().skip(start).take(end - start).collect())
}

/// Lowercase without changing the number of chars
fn fold_case(s: &str) -> String {
    s.chars().map(|c| c.to_lowercase().next().unwrap_or(c)).collect()
}
