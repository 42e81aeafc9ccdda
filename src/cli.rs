//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::{FilingQuery, Module};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// FinOps Platform CLI
///
/// Fetch SEC filings, summarize MD&A and Risk Factors, and publish
/// static HTML reports for GitHub Pages.
///
/// Examples:
///   finops analyst AAPL
///   finops analyst MSFT --forms 10-K --from 2023-01-01
///   finops fetch --cik 320193 --json
///   finops summarize --input data/filings/aapl_10-k_....htm
///   finops publish analyst
///   finops config init
#[derive(Parser, Debug, Clone)]
#[command(name = "finops", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .finops.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Cache directory for ticker mappings and filings
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Site root; pages land in <ROOT>/<module>/docs/
    #[arg(long, value_name = "DIR", global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render SEC filing analysis as HTML
    Analyst {
        /// Public company ticker (e.g., AAPL) or CIK
        ///
        /// Defaults to env ANALYST_DEFAULT_TICKER, the config file, or AAPL.
        ticker: Option<String>,

        #[command(flatten)]
        filter: FilingFilter,

        /// Highlight sentences per section
        #[arg(short = 'k', long, value_name = "N")]
        top_k: Option<usize>,
    },

    /// Fetch the latest filing from EDGAR into the local cache
    Fetch {
        /// Ticker symbol (e.g., AAPL)
        #[arg(conflicts_with = "cik")]
        ticker: Option<String>,

        /// SEC CIK (zero-padding optional)
        #[arg(long)]
        cik: Option<String>,

        #[command(flatten)]
        filter: FilingFilter,

        /// Print filing metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize a cached filing document
    Summarize {
        /// Path to a downloaded filing HTML document
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// Highlight sentences per section
        #[arg(short = 'k', long, value_name = "N")]
        top_k: Option<usize>,

        /// Output format
        #[arg(long, default_value = "text", value_name = "FORMAT")]
        format: OutputFormat,
    },

    /// Render the Trader placeholder report
    Trader,

    /// Build a module report and copy it to docs/<module> for GitHub Pages
    Publish {
        /// Module to publish
        module: Module,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective configuration (.finops.toml, .env and ENV vars)
    Show {
        /// Output JSON instead of TOML
        #[arg(long)]
        as_json: bool,
    },
    /// Generate a default .finops.toml
    Init,
}

/// Filing selection flags shared by `analyst` and `fetch`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilingFilter {
    /// SEC form types (space-separated)
    #[arg(long, num_args = 1.., value_name = "FORM")]
    pub forms: Option<Vec<String>>,

    /// Earliest filing date, YYYY-MM-DD
    #[arg(long = "from", value_name = "DATE")]
    pub date_from: Option<String>,

    /// Latest filing date, YYYY-MM-DD
    #[arg(long = "to", value_name = "DATE")]
    pub date_to: Option<String>,
}

/// Output format for `summarize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

fn parse_date(value: &str, flag: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("{} must be a date in YYYY-MM-DD format, got '{}'", flag, value))
}

impl FilingFilter {
    /// Build a filing query, falling back to `default_forms`.
    pub fn to_query(&self, default_forms: &[String]) -> Result<FilingQuery, String> {
        let forms = self
            .forms
            .clone()
            .unwrap_or_else(|| default_forms.to_vec());
        if forms.is_empty() {
            return Err("At least one form type is required".to_string());
        }

        let from = self
            .date_from
            .as_deref()
            .map(|d| parse_date(d, "--from"))
            .transpose()?;
        let to = self
            .date_to
            .as_deref()
            .map(|d| parse_date(d, "--to"))
            .transpose()?;

        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(format!("--from ({}) is after --to ({})", from, to));
            }
        }

        Ok(FilingQuery { forms, from, to })
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        let (filter, top_k) = match &self.command {
            Command::Analyst { filter, top_k, .. } => (Some(filter), *top_k),
            Command::Fetch { filter, .. } => (Some(filter), None),
            Command::Summarize { top_k, .. } => (None, *top_k),
            _ => (None, None),
        };

        if top_k == Some(0) {
            return Err("--top-k must be at least 1".to_string());
        }

        if let Some(filter) = filter {
            filter.to_query(&["10-K".to_string()])?;
        }

        if let Command::Summarize { input, .. } = &self.command {
            if !input.is_file() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_analyst_with_filters() {
        let args = parse(&[
            "finops", "analyst", "MSFT", "--forms", "10-K", "10-Q", "--from", "2023-01-01", "-k",
            "5",
        ]);
        match args.command {
            Command::Analyst {
                ticker,
                filter,
                top_k,
            } => {
                assert_eq!(ticker.as_deref(), Some("MSFT"));
                assert_eq!(filter.forms, Some(vec!["10-K".to_string(), "10-Q".to_string()]));
                assert_eq!(filter.date_from.as_deref(), Some("2023-01-01"));
                assert_eq!(top_k, Some(5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_publish_and_config() {
        let args = parse(&["finops", "-q", "publish", "trader"]);
        assert!(matches!(args.command, Command::Publish { module: Module::Trader }));
        assert!(args.quiet);

        let args = parse(&["finops", "config", "show", "--as-json"]);
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Show { as_json: true }
            }
        ));
    }

    #[test]
    fn test_fetch_ticker_conflicts_with_cik() {
        assert!(Args::try_parse_from(["finops", "fetch", "AAPL", "--cik", "320193"]).is_err());
    }

    #[test]
    fn test_filter_to_query() {
        let defaults = vec!["10-Q".to_string(), "10-K".to_string()];
        let query = FilingFilter::default().to_query(&defaults).unwrap();
        assert_eq!(query.forms, defaults);
        assert!(query.from.is_none());

        let bad = FilingFilter {
            date_from: Some("2024-13-01".to_string()),
            ..FilingFilter::default()
        };
        assert!(bad.to_query(&defaults).is_err());

        let inverted = FilingFilter {
            date_from: Some("2024-06-01".to_string()),
            date_to: Some("2024-01-01".to_string()),
            ..FilingFilter::default()
        };
        assert!(inverted.to_query(&defaults).is_err());

        let empty = FilingFilter {
            forms: Some(vec![]),
            ..FilingFilter::default()
        };
        assert!(empty.to_query(&defaults).is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let args = parse(&["finops", "-v", "-q", "trader"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_top_k_zero() {
        let args = parse(&["finops", "analyst", "AAPL", "-k", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = parse(&["finops", "trader"]);
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
