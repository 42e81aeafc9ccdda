//! Configuration file handling.
//!
//! This module handles loading `.finops.toml`, layering `.env` and
//! environment overrides on top, and merging CLI arguments last.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".finops.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// SEC EDGAR access settings.
    #[serde(default)]
    pub sec: SecConfig,

    /// Analyst module settings.
    #[serde(default)]
    pub analyst: AnalystConfig,

    /// Static site settings.
    #[serde(default)]
    pub site: SiteConfig,
}

/// SEC EDGAR settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecConfig {
    /// Contact email sent in the User-Agent (SEC fair-use policy).
    #[serde(default = "default_contact_email")]
    pub contact_email: String,

    /// Timeout for JSON API requests.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Timeout for primary document downloads.
    #[serde(default = "default_document_timeout")]
    pub document_timeout_seconds: u64,

    /// Base URL of the submissions API.
    #[serde(default = "default_data_base_url")]
    pub data_base_url: String,

    /// URL of the ticker to CIK helper file.
    #[serde(default = "default_tickers_url")]
    pub tickers_url: String,

    /// Base URL of the filing archives.
    #[serde(default = "default_archives_base_url")]
    pub archives_base_url: String,
}

impl Default for SecConfig {
    fn default() -> Self {
        Self {
            contact_email: default_contact_email(),
            timeout_seconds: default_timeout(),
            document_timeout_seconds: default_document_timeout(),
            data_base_url: default_data_base_url(),
            tickers_url: default_tickers_url(),
            archives_base_url: default_archives_base_url(),
        }
    }
}

impl SecConfig {
    /// User-Agent string sent with every SEC request.
    pub fn user_agent(&self) -> String {
        format!(
            "FinOpsPlatform/{} (+{})",
            env!("CARGO_PKG_VERSION"),
            self.contact_email
        )
    }
}

fn default_contact_email() -> String {
    "change-me@example.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_document_timeout() -> u64 {
    60
}

fn default_data_base_url() -> String {
    "https://data.sec.gov".to_string()
}

fn default_tickers_url() -> String {
    "https://www.sec.gov/files/company_tickers.json".to_string()
}

fn default_archives_base_url() -> String {
    "https://www.sec.gov/Archives/edgar/data".to_string()
}

/// Analyst module settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalystConfig {
    /// Ticker used when none is given on the command line.
    #[serde(default = "default_ticker")]
    pub default_ticker: String,

    /// Form types considered when picking the latest filing.
    #[serde(default = "default_forms")]
    pub forms: Vec<String>,

    /// Number of highlight sentences per section.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Cache directory for ticker mappings and downloaded filings.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            default_ticker: default_ticker(),
            forms: default_forms(),
            top_k: default_top_k(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_ticker() -> String {
    "AAPL".to_string()
}

fn default_forms() -> Vec<String> {
    vec!["10-Q".to_string(), "10-K".to_string()]
}

fn default_top_k() -> usize {
    3
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Static site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Repository root; module pages land in `<root>/<module>/docs/`.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Modules listed in the navigation bar.
    #[serde(default = "default_nav_modules")]
    pub nav_modules: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            nav_modules: default_nav_modules(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_nav_modules() -> Vec<String> {
    vec!["analyst".to_string(), "trader".to_string()]
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_optional(Path::new(CONFIG_FILE_NAME))
    }

    fn load_optional(path: &Path) -> Result<Option<Self>> {
        if path.exists() {
            Ok(Some(Self::load(path)?))
        } else {
            Ok(None)
        }
    }

    /// Check values serde accepts but the analyst cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.analyst.top_k == 0 {
            bail!("[analyst] top_k must be at least 1");
        }
        if self.analyst.forms.iter().all(|f| f.trim().is_empty()) {
            bail!("[analyst] forms must list at least one form type");
        }
        Ok(())
    }

    /// Apply overrides from the process environment.
    ///
    /// `.env` must already have been loaded for its values to show up here.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(email) = lookup("SEC_CONTACT_EMAIL").filter(|v| !v.trim().is_empty()) {
            self.sec.contact_email = email;
        }
        if let Some(ticker) = lookup("ANALYST_DEFAULT_TICKER").filter(|v| !v.trim().is_empty()) {
            self.analyst.default_ticker = ticker;
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence; only explicitly provided values override.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.data_dir {
            self.analyst.data_dir = dir.clone();
        }
        if let Some(ref root) = args.root {
            self.site.root = root.clone();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analyst.default_ticker, "AAPL");
        assert_eq!(config.analyst.forms, vec!["10-Q", "10-K"]);
        assert_eq!(config.analyst.top_k, 3);
        assert_eq!(config.site.nav_modules, vec!["analyst", "trader"]);
        assert_eq!(config.sec.data_base_url, "https://data.sec.gov");
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[sec]
contact_email = "ops@example.org"
timeout_seconds = 10

[analyst]
default_ticker = "MSFT"
forms = ["10-K"]

[site]
root = "public"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.sec.contact_email, "ops@example.org");
        assert_eq!(config.sec.timeout_seconds, 10);
        assert_eq!(config.sec.document_timeout_seconds, 60);
        assert_eq!(config.analyst.default_ticker, "MSFT");
        assert_eq!(config.analyst.forms, vec!["10-K"]);
        assert_eq!(config.analyst.top_k, 3);
        assert_eq!(config.site.root, PathBuf::from("public"));
    }

    #[test]
    fn test_user_agent_contains_contact() {
        let mut config = Config::default();
        config.sec.contact_email = "ops@example.org".to_string();
        let ua = config.sec.user_agent();
        assert!(ua.starts_with("FinOpsPlatform/"));
        assert!(ua.contains("(+ops@example.org)"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env_from(|key| match key {
            "SEC_CONTACT_EMAIL" => Some("me@example.org".to_string()),
            "ANALYST_DEFAULT_TICKER" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.sec.contact_email, "me@example.org");
        assert_eq!(config.analyst.default_ticker, "AAPL");
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[sec]"));
        assert!(toml_str.contains("[analyst]"));
        assert!(toml_str.contains("[site]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.analyst.default_ticker, "AAPL");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[analyst]\ntop_k = 5\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.analyst.top_k, 5);
        assert!(Config::load(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_load_rejects_zero_top_k() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[analyst]\ntop_k = 0\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("top_k must be at least 1"));
    }

    #[test]
    fn test_load_rejects_empty_forms() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[analyst]\nforms = []\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("forms must list at least one"));
    }

    #[test]
    fn test_validate_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_load_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(Config::load_optional(&path).unwrap().is_none());

        std::fs::write(&path, "[sec\ncontact_email = \"x\"\n").unwrap();
        let err = Config::load_optional(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }
}
