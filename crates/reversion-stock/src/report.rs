//! Plain-text reports handed back to the language model

use chrono::NaiveDate;

use crate::evidence::{ConversionCandidate, FilingDocument};
use crate::indicators::{Crossover, LowProximity, MacdPosition, MacdSummary, PriceRange};
use crate::source::{OptionsAvailability, Timeframe};

/// 52-week range summary
pub fn stock_data_report(ticker: &str, range: &PriceRange) -> String {
    format!(
        "Stock Data for {ticker}:\n\
         - Current Price: ${:.2}\n\
         - 52-Week High: ${:.2}\n\
         - 52-Week Low: ${:.2}\n\
         - Distance from 52W Low: {:.2}%\n\
         - Distance from 52W High: {:.2}%\n",
        range.current_price,
        range.week52_high,
        range.week52_low,
        range.distance_from_low * 100.0,
        range.distance_from_high * 100.0,
    )
}

/// Final-bar MACD readout
pub fn macd_report(ticker: &str, timeframe: Timeframe, summary: &MacdSummary) -> String {
    let position = match summary.position {
        MacdPosition::AboveZero => "Above",
        MacdPosition::BelowZero => "Below",
    };
    let signal = match summary.crossover {
        Crossover::Bullish => "Bullish",
        Crossover::Bearish => "Bearish",
    };
    let price_vs_macd = if summary.current_price > summary.macd_line.abs() {
        "Above"
    } else {
        "Below"
    };

    let mut report = format!(
        "MACD Analysis for {ticker} ({timeframe}):\n\
         - Current Price: ${:.2}\n\
         - MACD Line: {:.4}\n\
         - Signal Line: {:.4}\n\
         - Histogram: {:.4}\n\
         - MACD Position: {position} zero\n\
         - Signal: {signal} crossover\n\
         - Price vs MACD: {price_vs_macd} MACD level\n",
        summary.current_price, summary.macd_line, summary.signal_line, summary.histogram,
    );
    if !summary.warmed_up {
        report.push_str("- Note: fewer bars than the slow EMA span; values are not warmed up\n");
    }
    report
}

/// 52-week-low proximity readout
pub fn low_proximity_report(ticker: &str, result: &LowProximity, tolerance: f64) -> String {
    let near = if result.is_near_low { "✓ YES" } else { "✗ NO" };
    format!(
        "52-Week Low Analysis for {ticker}:\n\
         - Current Price: ${:.2}\n\
         - 52-Week Low: ${:.2}\n\
         - 52W Low Date: {}\n\
         - Distance: {:.2}%\n\
         - Near 52W Low: {near} (tolerance: {:.1}%)\n\
         - Days Since Low: {} days\n",
        result.current_price,
        result.week52_low,
        result.week52_low_date.format("%Y-%m-%d"),
        result.distance_pct * 100.0,
        tolerance * 100.0,
        result.days_since_low,
    )
}

/// Options availability; `None` means no listed expirations
pub fn optionable_report(ticker: &str, options: Option<&OptionsAvailability>) -> String {
    let Some(options) = options else {
        return format!("Options Availability for {ticker}: ✗ NO OPTIONS AVAILABLE");
    };
    format!(
        "Options Availability for {ticker}:\n\
         - Options Available: ✓ YES\n\
         - Number of Expirations: {}\n\
         - Next Expiration: {}\n\
         - Call Options Available: {}\n\
         - Options are tradeable: ✓ CONFIRMED\n",
        options.expirations,
        options.next_expiration.format("%Y-%m-%d"),
        options.call_count,
    )
}

/// Conversion candidates with their snippets in fenced blocks
pub fn conversion_report(
    ticker: &str,
    months_back: u32,
    candidates: &[ConversionCandidate],
) -> String {
    let mut report = format!(
        "Debt Conversion Search for {ticker} (Last {months_back} months):\n\
         Found {} potential conversion events\n\n",
        candidates.len()
    );

    for candidate in candidates {
        report.push_str(&format!(
            "- Date: {}\n  Accession: {}\n  URL: {}\n",
            candidate.filing_date.format("%Y-%m-%d"),
            candidate.accession_id.as_deref().unwrap_or("unknown"),
            candidate.source_url.as_deref().unwrap_or("unknown"),
        ));
        if !candidate.snippet.is_empty() {
            report.push_str("  Snippet:\n\n```\n");
            report.push_str(&candidate.snippet);
            report.push_str("\n```\n\n");
        }
    }
    report
}

/// Listing of recent filings of one form type
pub fn recent_filings_report(
    ticker: &str,
    form: &str,
    months: u32,
    count: usize,
    filings: &[(NaiveDate, &FilingDocument)],
) -> String {
    let mut report =
        format!("Recent {form} Filings for {ticker} (last {months} months, max {count}):\n\n");
    for (date, doc) in filings {
        report.push_str(&format!(
            "- {}: {}\n  Accession: {}\n  URL: {}\n\n",
            date.format("%Y-%m-%d"),
            doc.form.as_deref().unwrap_or(form),
            doc.accession_id.as_deref().unwrap_or("unknown"),
            doc.source_url.as_deref().unwrap_or("unknown"),
        ));
    }
    report
}
