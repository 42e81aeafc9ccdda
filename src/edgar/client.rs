//! SEC EDGAR HTTP client.
//!
//! Resolves tickers to CIKs, looks up the latest filing of a company and
//! downloads (and caches) its primary HTML document.

use crate::config::SecConfig;
use crate::edgar::submissions::Submissions;
use crate::edgar::tickers::{
    builtin_cik, cik_without_zeros, is_cik, normalize_ticker_symbol, pad_cik,
    parse_sec_ticker_mapping, TickerCache,
};
use crate::error::{EdgarError, Result};
use crate::models::{FilingMeta, FilingQuery};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Endpoints and cache locations used by the client.
#[derive(Debug, Clone)]
pub struct EdgarOptions {
    pub user_agent: String,
    pub timeout: Duration,
    pub document_timeout: Duration,
    pub data_base_url: String,
    pub tickers_url: String,
    pub archives_base_url: String,
    /// Root cache directory (`company_tickers.json` and `filings/`).
    pub data_dir: PathBuf,
    /// Show a spinner while downloading documents.
    pub show_progress: bool,
}

impl EdgarOptions {
    pub fn from_config(sec: &SecConfig, data_dir: &Path) -> Self {
        Self {
            user_agent: sec.user_agent(),
            timeout: Duration::from_secs(sec.timeout_seconds),
            document_timeout: Duration::from_secs(sec.document_timeout_seconds),
            data_base_url: sec.data_base_url.trim_end_matches('/').to_string(),
            tickers_url: sec.tickers_url.clone(),
            archives_base_url: sec.archives_base_url.trim_end_matches('/').to_string(),
            data_dir: data_dir.to_path_buf(),
            show_progress: false,
        }
    }
}

/// Client for the SEC EDGAR APIs.
pub struct EdgarClient {
    options: EdgarOptions,
    http: reqwest::Client,
    ticker_cache: TickerCache,
}

impl EdgarClient {
    pub fn new(options: EdgarOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        // Never force a Host header; SEC rejects mismatches.
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/html"),
        );
        let agent = HeaderValue::from_str(&options.user_agent)
            .map_err(|_| EdgarError::InvalidUserAgent(options.user_agent.clone()))?;
        headers.insert(USER_AGENT, agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .gzip(true)
            .timeout(options.timeout)
            .build()?;

        info!("EDGAR client ready (User-Agent: {})", options.user_agent);

        Ok(Self {
            ticker_cache: TickerCache::new(&options.data_dir),
            options,
            http,
        })
    }

    pub fn filings_dir(&self) -> PathBuf {
        self.options.data_dir.join("filings")
    }

    /// Company submissions JSON URL for a padded CIK.
    pub fn submissions_url(&self, padded_cik: &str) -> String {
        format!("{}/submissions/CIK{}.json", self.options.data_base_url, padded_cik)
    }

    /// Primary document URL:
    /// `<archives>/<cik without zeros>/<accession without dashes>/<primary>`.
    pub fn primary_document_url(
        &self,
        padded_cik: &str,
        accession_number: &str,
        primary_document: &str,
    ) -> String {
        format!(
            "{}/{}/{}/{}",
            self.options.archives_base_url,
            cik_without_zeros(padded_cik),
            accession_number.replace('-', ""),
            primary_document
        )
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<reqwest::Response> {
        debug!("GET {}", url);
        let response = self.http.get(url).timeout(timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EdgarError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    async fn get_text(&self, url: &str, timeout: Duration) -> Result<String> {
        Ok(self.get(url, timeout).await?.text().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        Ok(self.get(url, self.options.timeout).await?.json().await?)
    }

    async fn fetch_sec_ticker_mapping(&self) -> Result<std::collections::HashMap<String, String>> {
        let body = self
            .get_text(&self.options.tickers_url, self.options.timeout)
            .await?;
        parse_sec_ticker_mapping(&body)
    }

    /// Accept either a ticker (e.g. `AAPL`) or a numeric CIK.
    ///
    /// Resolution order: literal CIK, local cache, live SEC mapping
    /// (which refreshes the cache), builtin fallback.
    pub async fn ticker_to_cik(&self, symbol_or_cik: &str) -> Result<String> {
        let input = symbol_or_cik.trim();
        if is_cik(input) {
            return Ok(pad_cik(input));
        }

        let ticker = normalize_ticker_symbol(input);

        if let Some(cik) = self
            .ticker_cache
            .load()
            .and_then(|cached| cached.get(&ticker).cloned())
        {
            debug!(
                "Resolved {} from {}: {}",
                ticker,
                self.ticker_cache.path().display(),
                cik
            );
            return Ok(cik);
        }

        match self.fetch_sec_ticker_mapping().await {
            Ok(fresh) => {
                if let Err(e) = self.ticker_cache.save(&fresh) {
                    warn!("Could not write ticker cache: {}", e);
                }
                if let Some(cik) = fresh.get(&ticker) {
                    return Ok(cik.clone());
                }
            }
            Err(e) => warn!("Live ticker lookup failed, trying builtin list: {}", e),
        }

        builtin_cik(&ticker).ok_or_else(|| EdgarError::UnresolvedTicker {
            input: symbol_or_cik.to_string(),
            tickers_url: self.options.tickers_url.clone(),
        })
    }

    /// Metadata of the newest filing matching `query`, if any.
    pub async fn latest_filing_meta(
        &self,
        ticker_or_cik: &str,
        query: &FilingQuery,
    ) -> Result<Option<FilingMeta>> {
        let cik = self.ticker_to_cik(ticker_or_cik).await?;
        info!("Looking up filings for CIK {}", cik);

        let submissions: Submissions = self.get_json(&self.submissions_url(&cik)).await?;

        let meta = submissions.filings.recent.latest(
            query,
            &normalize_ticker_symbol(ticker_or_cik),
            &cik,
            &self.options.archives_base_url,
        );

        match &meta {
            Some(m) => info!("Latest {} filed {:?}: {}", m.form, m.filing_date, m.accession_number),
            None => info!("No filing matched forms {:?}", query.forms),
        }

        Ok(meta)
    }

    /// Local cache path for a filing's primary document.
    pub fn cache_path(&self, meta: &FilingMeta, primary_document: &str) -> PathBuf {
        let ticker = if meta.ticker.is_empty() {
            "unknown"
        } else {
            meta.ticker.as_str()
        };
        let file_name = format!(
            "{}_{}_{}_{}",
            ticker,
            meta.form,
            meta.accession_no_dashes(),
            primary_document
        )
        .to_lowercase();
        self.filings_dir().join(file_name)
    }

    /// Download and cache the filing's primary HTML document.
    ///
    /// A cached copy is returned without touching the network.
    pub async fn download_primary_document(&self, meta: &FilingMeta) -> Result<(PathBuf, String)> {
        let primary = meta
            .primary_document
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(EdgarError::MissingDocumentKeys)?;
        if meta.cik.is_empty() || meta.accession_number.is_empty() {
            return Err(EdgarError::MissingDocumentKeys);
        }

        let local_path = self.cache_path(meta, primary);
        if local_path.exists() {
            debug!("Using cached document: {}", local_path.display());
            let bytes = std::fs::read(&local_path)?;
            return Ok((local_path, String::from_utf8_lossy(&bytes).into_owned()));
        }

        let url = self.primary_document_url(&meta.cik, &meta.accession_number, primary);

        let spinner = if self.options.show_progress {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                pb.set_style(style);
            }
            pb.set_message(format!("Downloading {}", primary));
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        let result = self.get_text(&url, self.options.document_timeout).await;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        let html = result?;

        let dir = self.filings_dir();
        std::fs::create_dir_all(&dir).map_err(|source| EdgarError::Cache {
            path: dir.clone(),
            source,
        })?;
        std::fs::write(&local_path, html.as_bytes()).map_err(|source| EdgarError::Cache {
            path: local_path.clone(),
            source,
        })?;

        info!("Cached primary document at {}", local_path.display());
        Ok((local_path, html))
    }
}
