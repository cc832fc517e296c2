//! Caller-level composition: fetch, compute, report
//!
//! The analyzer is the only place where data sources and the pure engines
//! meet. Every public method returns a report string; failures are rendered
//! as diagnostic lines so one bad ticker never aborts a screening run.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ScreenerConfig;
use crate::error::{Result, StockError};
use crate::evidence::{FilingDocument, lookback_cutoff, scan_filings, select_recent_filings};
use crate::indicators::{check_series_low_proximity, compute_macd, summarize_price_range};
use crate::market::PriceSeries;
use crate::report;
use crate::source::{
    FilingRequest, FilingSource, HistoryRequest, OptionsAvailability, OptionsSource,
    PriceHistorySource, Timeframe,
};

/// Form type searched for conversion events
pub const CURRENT_REPORT_FORM: &str = "8-K";

/// Screening service over pluggable data sources
pub struct ReversionAnalyzer {
    prices: Arc<dyn PriceHistorySource>,
    filings: Arc<dyn FilingSource>,
    options: Arc<dyn OptionsSource>,
    config: Arc<ScreenerConfig>,
    today: fn() -> NaiveDate,
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

impl ReversionAnalyzer {
    /// Create an analyzer evaluating against the current UTC date
    pub fn new(
        prices: Arc<dyn PriceHistorySource>,
        filings: Arc<dyn FilingSource>,
        options: Arc<dyn OptionsSource>,
        config: Arc<ScreenerConfig>,
    ) -> Self {
        Self {
            prices,
            filings,
            options,
            config,
            today: utc_today,
        }
    }

    /// Replace the clock used for lookback windows and day counts
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    /// Current price against the 52-week high and low
    pub async fn stock_data_report(&self, ticker: &str) -> String {
        let result = async {
            let series = self.history(ticker, &HistoryRequest::one_year()).await?;
            summarize_price_range(&series)
        }
        .await;

        match result {
            Ok(range) => report::stock_data_report(ticker, &range),
            Err(e) => {
                warn!(ticker, error = %e, "stock data unavailable");
                format!("Could not retrieve stock data for {ticker}.")
            }
        }
    }

    /// MACD readout over the timeframe's history window
    pub async fn macd_report(&self, ticker: &str, timeframe: Timeframe) -> String {
        let result = async {
            let series = self.history(ticker, &timeframe.history_request()).await?;
            compute_macd(&series.closes(), self.config.macd)
        }
        .await;

        match result {
            Ok(macd) => report::macd_report(ticker, timeframe, &macd.summary()),
            Err(e) => {
                warn!(ticker, %timeframe, error = %e, "MACD calculation failed");
                format!("Could not calculate MACD for {ticker}.")
            }
        }
    }

    /// 52-week-low proximity; `tolerance` defaults to the configured value
    pub async fn low_report(&self, ticker: &str, tolerance: Option<f64>) -> String {
        let tolerance = tolerance.unwrap_or(self.config.low_tolerance);
        let today = (self.today)();
        let result = async {
            let series = self.history(ticker, &HistoryRequest::one_year()).await?;
            check_series_low_proximity(&series, tolerance, today)
        }
        .await;

        match result {
            Ok(proximity) => report::low_proximity_report(ticker, &proximity, tolerance),
            Err(e) => {
                warn!(ticker, error = %e, "52-week low check failed");
                format!("Could not retrieve stock data for {ticker}.")
            }
        }
    }

    /// Debt-conversion evidence in recent 8-K filings
    pub async fn conversion_report(&self, ticker: &str, months_back: Option<u32>) -> String {
        let months_back = months_back.unwrap_or(self.config.months_back);
        let cutoff = self.cutoff(months_back);

        let documents = match self.fetch_filings(ticker, CURRENT_REPORT_FORM).await {
            Ok(documents) => documents,
            Err(e) => {
                warn!(ticker, error = %e, "filing fetch failed");
                return format!("Error searching conversions for {ticker}: {e}");
            }
        };

        // the source may ignore the requested limit
        let documents = &documents[..documents.len().min(self.config.filing_scan_limit)];
        let scan = scan_filings(documents, cutoff, &self.config.extractor);
        info!(
            ticker,
            scanned = documents.len(),
            candidates = scan.candidates.len(),
            skipped = scan.skipped.len(),
            %cutoff,
            "conversion search complete"
        );
        report::conversion_report(ticker, months_back, &scan.candidates)
    }

    /// Up to `count` filings of `form` within the recent-filings window
    pub async fn recent_filings_report(&self, ticker: &str, form: &str, count: usize) -> String {
        let months = self.config.recent_filings_months;
        let documents = match self.fetch_filings(ticker, form).await {
            Ok(documents) => documents,
            Err(e) => {
                warn!(ticker, form, error = %e, "filing fetch failed");
                return format!("Error getting {form} filings for {ticker}: {e}");
            }
        };

        let recent = select_recent_filings(&documents, self.cutoff(months), count);
        report::recent_filings_report(ticker, form, months, count, &recent)
    }

    /// Whether listed options exist, with the nearest expiration's call count
    pub async fn optionable_report(&self, ticker: &str) -> String {
        match self.options_availability(ticker).await {
            Ok(options) => report::optionable_report(ticker, options.as_ref()),
            Err(e) => {
                warn!(ticker, error = %e, "options check failed");
                format!("Error checking options for {ticker}: {e}")
            }
        }
    }

    async fn options_availability(&self, ticker: &str) -> Result<Option<OptionsAvailability>> {
        let expirations = self.options.expirations(ticker).await?;
        let Some(&next_expiration) = expirations.first() else {
            return Ok(None);
        };
        let call_count = self.options.call_count(ticker, next_expiration).await?;
        Ok(Some(OptionsAvailability {
            expirations: expirations.len(),
            next_expiration,
            call_count,
        }))
    }

    async fn history(&self, ticker: &str, request: &HistoryRequest) -> Result<PriceSeries> {
        let series = self.prices.history(ticker, request).await?;
        if series.is_empty() {
            return Err(StockError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: format!("no {} history at {}", request.period, request.interval.as_str()),
            });
        }
        Ok(series)
    }

    async fn fetch_filings(&self, ticker: &str, form: &str) -> Result<Vec<FilingDocument>> {
        let request = FilingRequest {
            ticker: ticker.to_uppercase(),
            form: form.to_string(),
            limit: self.config.filing_scan_limit,
            identity: self.config.extractor.identity.clone(),
        };
        self.filings.filings(&request).await
    }

    fn cutoff(&self, months: u32) -> NaiveDate {
        lookback_cutoff((self.today)(), months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::PriceBar;
    use chrono::Days;
    use crate::source::{MockFilingSource, MockOptionsSource, MockPriceHistorySource};

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 11, 15).unwrap()
    }

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let date = start + Days::new(i as u64);
                PriceBar::new(date, close, close + 1.0, close - 1.0, close)
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    fn config() -> ScreenerConfig {
        ScreenerConfig::builder()
            .identity("Desk desk@example.com")
            .build()
            .unwrap()
    }

    fn analyzer(prices: MockPriceHistorySource, filings: MockFilingSource) -> ReversionAnalyzer {
        with_options(prices, filings, MockOptionsSource::new(), config())
    }

    fn with_options(
        prices: MockPriceHistorySource,
        filings: MockFilingSource,
        options: MockOptionsSource,
        config: ScreenerConfig,
    ) -> ReversionAnalyzer {
        ReversionAnalyzer::new(
            Arc::new(prices),
            Arc::new(filings),
            Arc::new(options),
            Arc::new(config),
        )
        .with_clock(fixed_today)
    }

    #[tokio::test]
    async fn test_macd_report_uses_timeframe_window() {
        let mut prices = MockPriceHistorySource::new();
        prices
            .expect_history()
            .withf(|ticker, request| ticker == "ACME" && request.period == "2y")
            .times(1)
            .returning(|_, _| Ok(series(&[100.0, 102.0, 101.5, 103.0, 105.0, 104.0])));

        let analyzer = analyzer(prices, MockFilingSource::new());
        let report = analyzer.macd_report("ACME", Timeframe::Weekly).await;

        assert!(report.starts_with("MACD Analysis for ACME (weekly):"));
        assert!(report.contains("- Current Price: $104.00"));
        assert!(report.contains("- MACD Line: 0.8674"));
        assert!(report.contains("- Signal: Bullish crossover"));
    }

    #[tokio::test]
    async fn test_empty_history_becomes_diagnostic() {
        let mut prices = MockPriceHistorySource::new();
        prices
            .expect_history()
            .returning(|_, _| Ok(PriceSeries::default()));

        let analyzer = analyzer(prices, MockFilingSource::new());
        assert_eq!(
            analyzer.macd_report("NONE", Timeframe::Daily).await,
            "Could not calculate MACD for NONE."
        );
        assert_eq!(
            analyzer.low_report("NONE", None).await,
            "Could not retrieve stock data for NONE."
        );
        assert_eq!(
            analyzer.stock_data_report("NONE").await,
            "Could not retrieve stock data for NONE."
        );
    }

    #[tokio::test]
    async fn test_low_report_counts_days_from_clock() {
        let mut prices = MockPriceHistorySource::new();
        prices
            .expect_history()
            .withf(|_, request| request == &HistoryRequest::one_year())
            .returning(|_, _| Ok(series(&[110.0, 105.0, 101.0, 101.5])));

        let report = analyzer(prices, MockFilingSource::new())
            .low_report("ACME", Some(0.05))
            .await;

        // lows are close - 1, so the minimum is 100.0 on 2023-01-04
        assert!(report.contains("- 52-Week Low: $100.00"));
        assert!(report.contains("- 52W Low Date: 2023-01-04"));
        assert!(report.contains("✓ YES"));
        assert!(report.contains("- Days Since Low: 315 days"));
    }

    #[tokio::test]
    async fn test_conversion_report_threads_identity_and_cutoff() {
        let mut filings = MockFilingSource::new();
        filings
            .expect_filings()
            .withf(|request| {
                request.ticker == "TEST"
                    && request.form == "8-K"
                    && request.identity.as_deref() == Some("Desk desk@example.com")
            })
            .times(1)
            .returning(|_| {
                Ok(vec![
                    FilingDocument::new(
                        "2023-10-26",
                        "This filing contains a debt conversion at a price of $10.50.",
                    )
                    .with_accession("0001-2-3")
                    .with_url("http://example.com/filing"),
                    FilingDocument::new("2023-01-05", "Convertible notes issued."),
                    FilingDocument::new("unknown", "debenture"),
                ])
            });

        let report = analyzer(MockPriceHistorySource::new(), filings)
            .conversion_report("test", None)
            .await;

        assert!(report.contains("Debt Conversion Search for test (Last 3 months)"));
        assert!(report.contains("Found 1 potential conversion events"));
        assert!(report.contains("- Date: 2023-10-26"));
        assert!(report.contains("URL: http://example.com/filing"));
    }

    #[tokio::test]
    async fn test_filing_errors_are_reported_inline() {
        let mut filings = MockFilingSource::new();
        filings.expect_filings().returning(|_| {
            Err(StockError::DataUnavailable {
                symbol: "BAD".to_string(),
                reason: "unknown company".to_string(),
            })
        });

        let report = analyzer(MockPriceHistorySource::new(), filings)
            .conversion_report("BAD", Some(1))
            .await;
        assert_eq!(
            report,
            "Error searching conversions for BAD: Data not available for BAD: unknown company"
        );
    }

    #[tokio::test]
    async fn test_recent_filings_report() {
        let mut filings = MockFilingSource::new();
        filings.expect_filings().returning(|_| {
            Ok(vec![
                FilingDocument::new("2023-10-27", "")
                    .with_form("8-K")
                    .with_accession("0004-5-6")
                    .with_url("http://example.com/filing2"),
                FilingDocument::new("2023-10-01", "").with_accession("0007"),
                FilingDocument::new("2022-01-01", "").with_accession("old"),
            ])
        });

        let report = analyzer(MockPriceHistorySource::new(), filings)
            .recent_filings_report("XYZ", "8-K", 1)
            .await;

        assert!(report.starts_with("Recent 8-K Filings for XYZ (last 6 months, max 1)"));
        assert!(report.contains("- 2023-10-27: 8-K"));
        assert!(!report.contains("0007"));
        assert!(!report.contains("old"));
    }

    #[tokio::test]
    async fn test_scan_stops_at_filing_limit() {
        let mut filings = MockFilingSource::new();
        filings
            .expect_filings()
            .withf(|request| request.limit == 2)
            .returning(|_| {
                Ok(vec![
                    FilingDocument::new("2023-10-01", "Quarterly results."),
                    FilingDocument::new("2023-10-02", "Board changes."),
                    FilingDocument::new("2023-10-03", "Debt conversion agreement."),
                ])
            });
        let config = ScreenerConfig::builder()
            .filing_scan_limit(2)
            .build()
            .unwrap();

        let report = with_options(
            MockPriceHistorySource::new(),
            filings,
            MockOptionsSource::new(),
            config,
        )
        .conversion_report("ACME", None)
        .await;
        assert!(report.contains("Found 0 potential conversion events"));
    }

    #[tokio::test]
    async fn test_optionable_report() {
        let expiry = NaiveDate::from_ymd_opt(2023, 11, 17).unwrap();
        let mut options = MockOptionsSource::new();
        options
            .expect_expirations()
            .withf(|ticker| ticker == "ACME")
            .returning(move |_| Ok(vec![expiry, expiry + Days::new(7)]));
        options
            .expect_call_count()
            .withf(move |_, expiration| *expiration == expiry)
            .times(1)
            .returning(|_, _| Ok(31));

        let report = with_options(
            MockPriceHistorySource::new(),
            MockFilingSource::new(),
            options,
            config(),
        )
        .optionable_report("ACME")
        .await;

        assert!(report.contains("- Number of Expirations: 2"));
        assert!(report.contains("- Next Expiration: 2023-11-17"));
        assert!(report.contains("- Call Options Available: 31"));
    }

    #[tokio::test]
    async fn test_optionable_report_without_options_or_on_error() {
        let mut options = MockOptionsSource::new();
        options
            .expect_expirations()
            .withf(|ticker| ticker == "NOPT")
            .returning(|_| Ok(Vec::new()));
        options
            .expect_expirations()
            .withf(|ticker| ticker == "BAD")
            .returning(|ticker| {
                Err(StockError::DataUnavailable {
                    symbol: ticker.to_string(),
                    reason: "options endpoint down".to_string(),
                })
            });
        options.expect_call_count().never();

        let analyzer = with_options(
            MockPriceHistorySource::new(),
            MockFilingSource::new(),
            options,
            config(),
        );
        assert_eq!(
            analyzer.optionable_report("NOPT").await,
            "Options Availability for NOPT: ✗ NO OPTIONS AVAILABLE"
        );
        assert_eq!(
            analyzer.optionable_report("BAD").await,
            "Error checking options for BAD: Data not available for BAD: options endpoint down"
        );
    }
}
