//! Configuration for screening operations

use crate::error::{Result, StockError};
use crate::evidence::ExtractorConfig;
use crate::indicators::MacdParams;
use serde::{Deserialize, Serialize};

/// Environment variable carrying the SEC identity (name and contact email)
pub const ENV_SEC_IDENTITY: &str = "SEC_API_USER_AGENT";
/// Environment variable overriding the 52-week-low tolerance fraction
pub const ENV_LOW_TOLERANCE: &str = "REVERSION_LOW_TOLERANCE";
/// Environment variable overriding the conversion lookback in months
pub const ENV_MONTHS_BACK: &str = "REVERSION_MONTHS_BACK";

/// Configuration for screening operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerConfig {
    /// MACD spans
    pub macd: MacdParams,

    /// Maximum fractional distance above the 52-week low that counts as "near"
    pub low_tolerance: f64,

    /// Lookback for debt-conversion searches, in 30-day months
    pub months_back: u32,

    /// Lookback for recent-filing listings, in 30-day months
    pub recent_filings_months: u32,

    /// Upper bound on filings requested from the filing source per search
    pub filing_scan_limit: usize,

    /// Keyword set, window and identity for the evidence extractor
    pub extractor: ExtractorConfig,

    /// Default token budget for markdown rendering
    pub render_max_tokens: usize,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            macd: MacdParams::default(),
            low_tolerance: 0.05,
            months_back: 3,
            recent_filings_months: 6,
            filing_scan_limit: 200,
            extractor: ExtractorConfig::default(),
            render_max_tokens: 1200,
        }
    }
}

impl ScreenerConfig {
    /// Create a new configuration builder
    pub fn builder() -> ScreenerConfigBuilder {
        ScreenerConfigBuilder::default()
    }

    /// Apply overrides from process environment variables
    pub fn with_env(self) -> Result<Self> {
        self.with_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_lookup<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(identity) = lookup(ENV_SEC_IDENTITY).filter(|v| !v.trim().is_empty()) {
            self.extractor.identity = Some(identity);
        }
        if let Some(raw) = lookup(ENV_LOW_TOLERANCE) {
            self.low_tolerance = raw.trim().parse().map_err(|_| {
                StockError::ConfigError(format!("{ENV_LOW_TOLERANCE} is not a number: {raw}"))
            })?;
        }
        if let Some(raw) = lookup(ENV_MONTHS_BACK) {
            self.months_back = raw.trim().parse().map_err(|_| {
                StockError::ConfigError(format!("{ENV_MONTHS_BACK} is not a month count: {raw}"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.macd.validate()?;

        if !self.low_tolerance.is_finite() || self.low_tolerance < 0.0 {
            return Err(StockError::ConfigError(
                "low_tolerance must be a non-negative number".to_string(),
            ));
        }

        if self.extractor.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(StockError::ConfigError(
                "at least one conversion keyword is required".to_string(),
            ));
        }

        if self.filing_scan_limit == 0 {
            return Err(StockError::ConfigError(
                "filing_scan_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for ScreenerConfig
#[derive(Debug, Default)]
pub struct ScreenerConfigBuilder {
    macd: Option<MacdParams>,
    low_tolerance: Option<f64>,
    months_back: Option<u32>,
    recent_filings_months: Option<u32>,
    filing_scan_limit: Option<usize>,
    keywords: Option<Vec<String>>,
    identity: Option<String>,
    render_max_tokens: Option<usize>,
}

impl ScreenerConfigBuilder {
    /// Set the MACD spans
    pub fn macd(mut self, params: MacdParams) -> Self {
        self.macd = Some(params);
        self
    }

    /// Set the 52-week-low tolerance fraction
    pub fn low_tolerance(mut self, tolerance: f64) -> Self {
        self.low_tolerance = Some(tolerance);
        self
    }

    /// Set the conversion lookback in months
    pub fn months_back(mut self, months: u32) -> Self {
        self.months_back = Some(months);
        self
    }

    /// Set the recent-filings lookback in months
    pub fn recent_filings_months(mut self, months: u32) -> Self {
        self.recent_filings_months = Some(months);
        self
    }

    /// Set the maximum number of filings scanned per search
    pub fn filing_scan_limit(mut self, limit: usize) -> Self {
        self.filing_scan_limit = Some(limit);
        self
    }

    /// Replace the conversion keyword set
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    /// Set the SEC identity sent with filing requests
    pub fn identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Set the default render token budget
    pub fn render_max_tokens(mut self, tokens: usize) -> Self {
        self.render_max_tokens = Some(tokens);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ScreenerConfig> {
        let defaults = ScreenerConfig::default();

        let mut extractor = defaults.extractor;
        if let Some(keywords) = self.keywords {
            extractor.keywords = keywords;
        }
        if self.identity.is_some() {
            extractor.identity = self.identity;
        }

        let config = ScreenerConfig {
            macd: self.macd.unwrap_or(defaults.macd),
            low_tolerance: self.low_tolerance.unwrap_or(defaults.low_tolerance),
            months_back: self.months_back.unwrap_or(defaults.months_back),
            recent_filings_months: self
                .recent_filings_months
                .unwrap_or(defaults.recent_filings_months),
            filing_scan_limit: self.filing_scan_limit.unwrap_or(defaults.filing_scan_limit),
            extractor,
            render_max_tokens: self.render_max_tokens.unwrap_or(defaults.render_max_tokens),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ScreenerConfig::default();
        assert_eq!(config.macd.short_period, 12);
        assert_eq!(config.macd.long_period, 26);
        assert_eq!(config.macd.signal_period, 9);
        assert!((config.low_tolerance - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.months_back, 3);
        assert_eq!(config.extractor.keywords.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ScreenerConfig::builder()
            .low_tolerance(0.1)
            .months_back(6)
            .keywords(["debenture"])
            .identity("Research Desk research@example.com")
            .build()
            .unwrap();

        assert_eq!(config.months_back, 6);
        assert_eq!(config.extractor.keywords, vec!["debenture".to_string()]);
        assert_eq!(
            config.extractor.identity.as_deref(),
            Some("Research Desk research@example.com")
        );
    }

    #[test]
    fn test_validation_rejects_negative_tolerance() {
        let result = ScreenerConfig::builder().low_tolerance(-0.01).build();
        assert!(matches!(result, Err(StockError::ConfigError(_))));
    }

    #[test]
    fn test_validation_rejects_empty_keywords() {
        let result = ScreenerConfig::builder().keywords(Vec::<String>::new()).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_SEC_IDENTITY, "Desk desk@example.com"),
            (ENV_LOW_TOLERANCE, "0.02"),
            (ENV_MONTHS_BACK, "12"),
        ]);
        let config = ScreenerConfig::default()
            .with_lookup(|k| vars.get(k).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.extractor.identity.as_deref(), Some("Desk desk@example.com"));
        assert!((config.low_tolerance - 0.02).abs() < f64::EPSILON);
        assert_eq!(config.months_back, 12);
    }

    #[test]
    fn test_env_rejects_garbage() {
        let result = ScreenerConfig::default()
            .with_lookup(|k| (k == ENV_MONTHS_BACK).then(|| "soon".to_string()));
        assert!(matches!(result, Err(StockError::ConfigError(_))));
    }
}
