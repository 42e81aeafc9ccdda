//! Data models for the FinOps platform.
//!
//! This module contains the core data structures shared between the
//! EDGAR client, the text analysis and the report renderers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata describing one SEC filing.
///
/// Keys serialize in camelCase to match the EDGAR submissions payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingMeta {
    /// Normalized ticker (or the digits of a CIK if one was given).
    pub ticker: String,
    /// Zero-padded 10-digit CIK.
    pub cik: String,
    /// Form type, e.g. `10-K`.
    pub form: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filing_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_date: Option<String>,
    /// Accession number with dashes, e.g. `0000320193-24-000123`.
    pub accession_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_document: Option<String>,
    /// Link to the filing index page on sec.gov.
    pub filing_detail_url: String,
}

impl FilingMeta {
    /// Accession number with the dashes stripped, as used in archive paths.
    pub fn accession_no_dashes(&self) -> String {
        self.accession_number.replace('-', "")
    }
}

/// Which filings to consider when picking the latest one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingQuery {
    /// Accepted form types.
    pub forms: Vec<String>,
    /// Earliest filing date (inclusive).
    pub from: Option<NaiveDate>,
    /// Latest filing date (inclusive).
    pub to: Option<NaiveDate>,
}

impl Default for FilingQuery {
    fn default() -> Self {
        Self {
            forms: vec!["10-Q".to_string(), "10-K".to_string()],
            from: None,
            to: None,
        }
    }
}

impl FilingQuery {
    /// Returns true if a filing with this form and date passes the query.
    ///
    /// Filings without a parseable date are only excluded when a date
    /// bound is set.
    pub fn accepts(&self, form: &str, filing_date: Option<&str>) -> bool {
        if !self.forms.iter().any(|f| f == form) {
            return false;
        }

        if self.from.is_none() && self.to.is_none() {
            return true;
        }

        let Some(date) = filing_date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        else {
            return false;
        };

        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Raw text of the sections pulled out of a filing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTexts {
    /// Management's Discussion and Analysis (Item 7).
    pub mdna: String,
    /// Risk Factors (Item 1A).
    pub risk: String,
}

/// Top sentences per section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlights {
    pub mdna: Vec<String>,
    pub risk: Vec<String>,
}

/// A platform module that renders its own report page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Module {
    Analyst,
    Trader,
}

impl Module {
    /// Directory name and URL segment of the module.
    pub fn slug(&self) -> &'static str {
        match self {
            Module::Analyst => "analyst",
            Module::Trader => "trader",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}
