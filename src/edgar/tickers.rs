//! Ticker and CIK helpers.
//!
//! Pure functions for normalizing symbols and CIKs, plus the on-disk
//! ticker mapping cache.

use crate::error::{EdgarError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

static CIK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,10}$").expect("valid CIK regex"));

/// A handful of well-known tickers, used when SEC is unreachable.
const BUILTIN_CIK_FALLBACK: &[(&str, &str)] = &[
    ("AAPL", "0000320193"),
    ("MSFT", "0000789019"),
    ("AMZN", "0001018724"),
    ("GOOGL", "0001652044"), // Alphabet Inc. Class A
    ("TSLA", "0001318605"),
];

/// Strip everything but ASCII letters and digits, then uppercase.
pub fn normalize_ticker_symbol(ticker: &str) -> String {
    ticker
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Zero-pad a CIK to the 10 digits SEC expects.
pub fn pad_cik(cik: impl ToString) -> String {
    format!("{:0>10}", cik.to_string())
}

/// Whether the input already is a CIK.
pub fn is_cik(input: &str) -> bool {
    CIK_RE.is_match(input)
}

/// CIK without leading zeros, as used in archive URLs.
pub fn cik_without_zeros(cik: &str) -> &str {
    let trimmed = cik.trim_start_matches('0');
    if trimmed.is_empty() {
        "0"
    } else {
        trimmed
    }
}

pub fn builtin_cik(ticker: &str) -> Option<String> {
    BUILTIN_CIK_FALLBACK
        .iter()
        .find(|(t, _)| *t == ticker)
        .map(|(_, cik)| cik.to_string())
}

/// One record of SEC's `company_tickers.json`.
#[derive(Debug, Deserialize)]
struct TickerRecord {
    ticker: String,
    cik_str: serde_json::Value,
}

/// Parse SEC's helper payload into `{TICKER -> padded CIK}`.
///
/// Shape: `{"0": {"ticker": "...", "cik_str": 123, ...}, ...}`
pub fn parse_sec_ticker_mapping(payload: &str) -> Result<HashMap<String, String>> {
    let records: HashMap<String, TickerRecord> = serde_json::from_str(payload)?;

    Ok(records
        .into_values()
        .map(|rec| {
            let cik = match rec.cik_str {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (rec.ticker.to_uppercase(), pad_cik(cik))
        })
        .collect())
}

/// On-disk cache of the ticker mapping.
#[derive(Debug, Clone)]
pub struct TickerCache {
    path: PathBuf,
}

impl TickerCache {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("company_tickers.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached mapping. A missing or corrupt cache counts as absent.
    pub fn load(&self) -> Option<HashMap<String, String>> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let data: HashMap<String, serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(d) => d,
            Err(e) => {
                debug!("Ignoring unreadable ticker cache {}: {}", self.path.display(), e);
                return None;
            }
        };

        Some(
            data.into_iter()
                .map(|(k, v)| {
                    let cik = match v {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    (k.to_uppercase(), pad_cik(cik))
                })
                .collect(),
        )
    }

    pub fn save(&self, mapping: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| EdgarError::Cache {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string(mapping)?;
        std::fs::write(&self.path, content).map_err(|source| EdgarError::Cache {
            path: self.path.clone(),
            source,
        })
    }
}
