//! Error types for SEC EDGAR access.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SEC returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid User-Agent '{0}'; check [sec] contact_email / SEC_CONTACT_EMAIL")]
    InvalidUserAgent(String),

    #[error("Could not resolve '{input}' to a CIK. Try passing a CIK directly (digits only) or check access to {tickers_url}.")]
    UnresolvedTicker { input: String, tickers_url: String },

    #[error("Missing keys to download primary document: need cik, accessionNumber, primaryDocument.")]
    MissingDocumentKeys,

    #[error("Failed to write cache file {path}: {source}")]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, EdgarError>;
