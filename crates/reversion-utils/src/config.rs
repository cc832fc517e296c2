//! Process configuration read from the environment

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable selecting the deployment environment
pub const ENV_ENVIRONMENT: &str = "REVERSION_ENV";
/// Environment variable selecting the log output format
pub const ENV_LOG_FORMAT: &str = "REVERSION_LOG_FORMAT";

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, one event per line
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Returned when a log format name is not recognised
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown log format '{0}', expected 'pretty' or 'json'")]
pub struct UnknownLogFormat(pub String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" | "" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(UnknownLogFormat(other.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (dev, prod, etc.)
    pub environment: String,
    /// Log line format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "reversion-rs".to_string(),
            environment: "development".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Build a configuration from process environment variables
    pub fn from_env() -> Result<Self, UnknownLogFormat> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    ///
    /// Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, UnknownLogFormat>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(environment) = lookup(ENV_ENVIRONMENT) {
            config.environment = environment;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            config.log_format = format.parse()?;
        }
        Ok(config)
    }

    /// Whether this is a production deployment
    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "prod" | "production")
    }
}
