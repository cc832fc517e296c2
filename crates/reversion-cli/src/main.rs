//! Command-line interface for reversion-rs
//!
//! Every subcommand works on JSON files (or `-` for stdin) holding data
//! fetched elsewhere: price bars, filing documents or raw tool output.

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use reversion_stock::evidence::{
    decode_filings, lookback_cutoff, scan_filing_values, select_recent_filings,
};
use reversion_stock::indicators::check_series_low_proximity;
use reversion_stock::render::{RenderMode, RenderOptions, RenderedMarkdown};
use reversion_stock::{
    MacdParams, PriceSeries, ScreenerConfig, Timeframe, compute_macd,
    register_tools, render_structured_result, report, summarize_price_range,
};
use reversion_tools::ToolRegistry;
use reversion_utils::{Config, init_tracing_with};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "reversion-cli")]
#[command(about = "Mean-reversion screening over local JSON data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// MACD readout for a bar series
    Macd {
        /// JSON array of OHLC bars, or `-` for stdin
        input: PathBuf,
        #[arg(short, long, default_value = "INPUT")]
        ticker: String,
        /// Label only; the bars decide the actual spacing
        #[arg(long, default_value = "daily")]
        timeframe: Timeframe,
        #[arg(long)]
        short: Option<usize>,
        #[arg(long)]
        long: Option<usize>,
        #[arg(long)]
        signal: Option<usize>,
        /// Fail when the series is shorter than the slow span
        #[arg(long)]
        strict: bool,
    },
    /// 52-week-low proximity for a bar series
    Low {
        input: PathBuf,
        #[arg(short, long, default_value = "INPUT")]
        ticker: String,
        /// Fractional tolerance above the low
        #[arg(long)]
        tolerance: Option<f64>,
        /// Evaluation date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Current price against the 52-week high and low
    Range {
        input: PathBuf,
        #[arg(short, long, default_value = "INPUT")]
        ticker: String,
    },
    /// Scan filing documents for debt-conversion language
    Conversions {
        /// JSON array of filing documents, or `-` for stdin
        input: PathBuf,
        #[arg(short, long, default_value = "INPUT")]
        ticker: String,
        #[arg(long)]
        months_back: Option<u32>,
        /// Explicit cutoff date; overrides --months-back
        #[arg(long)]
        cutoff: Option<NaiveDate>,
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Replacement keyword, repeatable
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,
        /// Print the full scan, skips included, as JSON
        #[arg(long)]
        json: bool,
    },
    /// Recent filings of one form type
    Recent {
        input: PathBuf,
        #[arg(short, long, default_value = "INPUT")]
        ticker: String,
        #[arg(long, default_value = "8-K")]
        form: String,
        #[arg(long, default_value_t = 5)]
        count: usize,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Dollar amounts found in a text file
    Prices {
        /// Plain text file, or `-` for stdin
        input: PathBuf,
    },
    /// Render a structured tool result as markdown
    Render {
        /// Any JSON value, or `-` for stdin
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = ModeArg::Snippet)]
        mode: ModeArg,
        #[arg(long)]
        max_tokens: Option<usize>,
        /// Print the rendered result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the JSON tool definitions
    Tools,
    /// Call a tool by name with JSON parameters
    Call {
        name: String,
        /// JSON parameters file, or `-` for stdin; `{}` when omitted
        #[arg(long)]
        params: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Snippet,
    Chunked,
}

impl From<ModeArg> for RenderMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Snippet => RenderMode::Snippet,
            ModeArg::Chunked => RenderMode::Chunked,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let app = Config::from_env()?;
    init_tracing_with(app.log_format);

    let cli = Cli::parse();
    let config = ScreenerConfig::default()
        .with_env()
        .context("invalid screener configuration")?;
    info!(environment = %app.environment, "Starting reversion-cli");

    let output = run(cli.command, Arc::new(config)).await?;
    println!("{output}");
    Ok(())
}

async fn run(command: Commands, config: Arc<ScreenerConfig>) -> Result<String> {
    let today = Utc::now().date_naive();

    match command {
        Commands::Macd {
            input,
            ticker,
            timeframe,
            short,
            long,
            signal,
            strict,
        } => {
            let series: PriceSeries = read_json(&input)?;
            let params = MacdParams {
                short_period: short.unwrap_or(config.macd.short_period),
                long_period: long.unwrap_or(config.macd.long_period),
                signal_period: signal.unwrap_or(config.macd.signal_period),
                require_full_window: strict || config.macd.require_full_window,
            };
            let macd = compute_macd(&series.closes(), params)?;
            Ok(report::macd_report(&ticker, timeframe, &macd.summary()))
        }
        Commands::Low {
            input,
            ticker,
            tolerance,
            as_of,
        } => {
            let series: PriceSeries = read_json(&input)?;
            let tolerance = tolerance.unwrap_or(config.low_tolerance);
            let proximity = check_series_low_proximity(&series, tolerance, as_of.unwrap_or(today))?;
            Ok(report::low_proximity_report(&ticker, &proximity, tolerance))
        }
        Commands::Range { input, ticker } => {
            let series: PriceSeries = read_json(&input)?;
            Ok(report::stock_data_report(&ticker, &summarize_price_range(&series)?))
        }
        Commands::Conversions {
            input,
            ticker,
            months_back,
            cutoff,
            as_of,
            keywords,
            json,
        } => {
            let records: Vec<Value> = read_json(&input)?;
            let months_back = months_back.unwrap_or(config.months_back);
            let cutoff = cutoff.unwrap_or_else(|| lookback_cutoff(as_of.unwrap_or(today), months_back));

            let mut extractor = config.extractor.clone();
            if !keywords.is_empty() {
                extractor.keywords = keywords;
            }

            let scan = scan_filing_values(&records, cutoff, &extractor);
            debug!(%cutoff, skipped = scan.skipped.len(), "scan finished");
            if json {
                Ok(serde_json::to_string_pretty(&scan)?)
            } else {
                Ok(report::conversion_report(&ticker, months_back, &scan.candidates))
            }
        }
        Commands::Recent {
            input,
            ticker,
            form,
            count,
            as_of,
        } => {
            let records: Vec<Value> = read_json(&input)?;
            let documents = decode_filings(&records);
            let months = config.recent_filings_months;
            let recent = select_recent_filings(
                &documents,
                lookback_cutoff(as_of.unwrap_or(today), months),
                count,
            );
            Ok(report::recent_filings_report(&ticker, &form, months, count, &recent))
        }
        Commands::Prices { input } => {
            let text = read_input(&input)?;
            let prices = reversion_stock::extract_price_candidates(&text);
            Ok(serde_json::to_string(&prices)?)
        }
        Commands::Render {
            input,
            mode,
            max_tokens,
            json,
        } => {
            let structured: Value = read_json(&input)?;
            let options = RenderOptions::new(
                mode.into(),
                max_tokens.unwrap_or(config.render_max_tokens),
            );
            let rendered = render_structured_result(&structured, options);
            if json {
                Ok(serde_json::to_string_pretty(&rendered)?)
            } else {
                Ok(format_rendered(&rendered))
            }
        }
        Commands::Tools => {
            let registry = ToolRegistry::new();
            register_tools(&registry, config);
            Ok(serde_json::to_string_pretty(&registry.definitions())?)
        }
        Commands::Call { name, params } => {
            let params: Value = match params {
                Some(path) => read_json(&path)?,
                None => Value::Object(serde_json::Map::new()),
            };
            let registry = ToolRegistry::new();
            register_tools(&registry, config);
            if registry.get(&name).is_none() {
                bail!(
                    "unknown tool '{name}', available: {}",
                    registry.names().join(", ")
                );
            }
            let output = registry.call(&name, params).await?;
            Ok(serde_json::to_string_pretty(&output)?)
        }
    }
}

fn format_rendered(rendered: &RenderedMarkdown) -> String {
    match rendered {
        RenderedMarkdown::Snippet { markdown, .. } => markdown.clone(),
        RenderedMarkdown::Chunked { chunks } => chunks
            .iter()
            .map(|chunk| {
                format!(
                    "<!-- chunk {} ({} chars) -->\n{}",
                    chunk.index, chunk.length, chunk.markdown
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}
