//! Filing documents and their loosely typed dates

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Filing date as delivered by the filings provider
///
/// Providers hand back native dates, timestamps, free-form strings or
/// nothing at all. [`FilingDate::resolve`] turns any of these into a
/// calendar date when possible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilingDate {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(String),
    #[default]
    Missing,
}

impl FilingDate {
    /// Calendar date of the filing, if one can be determined
    pub fn resolve(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            Self::DateTime(datetime) => Some(datetime.date()),
            Self::Text(raw) => parse_date_text(raw),
            Self::Missing => None,
        }
    }
}

impl From<NaiveDate> for FilingDate {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<&str> for FilingDate {
    fn from(raw: &str) -> Self {
        Self::Text(raw.to_string())
    }
}

/// Parse a textual filing date
///
/// Tried in order: RFC 3339 timestamp with offset, naive ISO date-time
/// (`T` or space separated), ISO date, and finally the date part in front
/// of a `T`.
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Some(ts.date());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    let (head, _) = s.split_once('T')?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// One filing with whatever metadata the provider returned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilingDocument {
    #[serde(default, alias = "date")]
    pub filing_date: FilingDate,
    #[serde(default, alias = "accession", alias = "accession_no")]
    pub accession_id: Option<String>,
    #[serde(default, alias = "url")]
    pub source_url: Option<String>,
    /// Form type such as `8-K`
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default, alias = "text")]
    pub raw_text: Option<String>,
}

impl FilingDocument {
    /// Create a document with a date and body text
    pub fn new(filing_date: impl Into<FilingDate>, raw_text: impl Into<String>) -> Self {
        Self {
            filing_date: filing_date.into(),
            raw_text: Some(raw_text.into()),
            ..Self::default()
        }
    }

    /// Decode one provider record, or `None` when its shape is unusable
    pub fn from_value(record: &Value) -> Option<Self> {
        match Self::deserialize(record) {
            Ok(doc) => Some(doc),
            Err(e) => {
                debug!(error = %e, "malformed filing record");
                None
            }
        }
    }

    pub fn with_accession(mut self, accession_id: impl Into<String>) -> Self {
        self.accession_id = Some(accession_id.into());
        self
    }

    pub fn with_url(mut self, source_url: impl Into<String>) -> Self {
        self.source_url = Some(source_url.into());
        self
    }

    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.form = Some(form.into());
        self
    }
}

/// Decode provider records one at a time, dropping the malformed ones
pub fn decode_filings(records: &[Value]) -> Vec<FilingDocument> {
    records.iter().filter_map(FilingDocument::from_value).collect()
}

/// Accession number of a raw record, read even when the record as a whole
/// does not decode
pub fn accession_hint(record: &Value) -> Option<String> {
    ["accession_id", "accession", "accession_no"]
        .iter()
        .find_map(|key| match record.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// Lookback windows count a month as 30 days
pub const DAYS_PER_MONTH: u64 = 30;

/// First calendar date inside a window of `months` ending at `today`
pub fn lookback_cutoff(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(months) * DAYS_PER_MONTH))
        .unwrap_or(NaiveDate::MIN)
}

/// Dated documents on or after `cutoff`, in input order, at most `count`
///
/// Undated documents are dropped.
pub fn select_recent_filings(
    documents: &[FilingDocument],
    cutoff: NaiveDate,
    count: usize,
) -> Vec<(NaiveDate, &FilingDocument)> {
    documents
        .iter()
        .filter_map(|doc| doc.filing_date.resolve().map(|date| (date, doc)))
        .filter(|(date, _)| *date >= cutoff)
        .take(count)
        .collect()
}
