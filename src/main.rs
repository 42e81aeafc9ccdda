//! FinOps Platform - SEC filing analyst and report publisher
//!
//! A CLI tool that pulls the latest 10-Q/10-K for a company from SEC
//! EDGAR, summarizes MD&A and Risk Factors with TF-IDF, and renders
//! static HTML pages for GitHub Pages.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (network, config, missing filing data, etc.)
//!   2 - Invalid command-line usage

mod analysis;
mod cli;
mod config;
mod edgar;
mod error;
mod models;
mod publish;
mod report;

use anyhow::{Context, Result};
use cli::{Args, Command, ConfigAction, FilingFilter, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use edgar::{EdgarClient, EdgarOptions};
use models::Module;
use report::analyst::AnalystOptions;
use report::SiteContext;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Variables from .env feed both clap and the config layer
    let _ = dotenvy::dotenv();

    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    // Config commands don't need logging
    if let Command::Config { ref action } = args.command {
        return handle_config(&args, action);
    }

    init_logging(&args);

    info!("FinOps v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("\n✗ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so stdout stays parseable in JSON modes. `RUST_LOG`,
/// when set, replaces the `-v`/`-q` level.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults, then layer env and CLI.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        Config::load(config_path)?
    } else {
        // A present but unparseable file is an error
        match Config::load_default()? {
            Some(config) => {
                info!("Loaded default config from {}", CONFIG_FILE_NAME);
                config
            }
            None => {
                debug!("No config file found, using defaults");
                Config::default()
            }
        }
    };

    config.apply_env();
    config.merge_with_args(args);
    Ok(config)
}

fn edgar_client(config: &Config, args: &Args) -> Result<EdgarClient> {
    let mut options = EdgarOptions::from_config(&config.sec, &config.analyst.data_dir);
    options.show_progress = !args.quiet;
    EdgarClient::new(options).context("Failed to create SEC EDGAR client")
}

fn query_from(filter: &FilingFilter, config: &Config) -> Result<models::FilingQuery> {
    filter
        .to_query(&config.analyst.forms)
        .map_err(anyhow::Error::msg)
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let site = SiteContext::from(&config);

    match &args.command {
        Command::Analyst {
            ticker,
            filter,
            top_k,
        } => {
            let ticker = ticker
                .clone()
                .unwrap_or_else(|| config.analyst.default_ticker.clone());
            let options = AnalystOptions {
                query: query_from(filter, &config)?,
                top_k: top_k.unwrap_or(config.analyst.top_k),
            };
            let client = edgar_client(&config, &args)?;

            println!("[finops] Rendering Analyst report for {} …", ticker);
            let path = report::analyst::render_report(&client, &site, &ticker, &options)
                .await
                .with_context(|| format!("Failed to render report for {}", ticker))?;
            println!("[finops] ✓ Wrote report: {}", path.display());
        }

        Command::Fetch {
            ticker,
            cik,
            filter,
            json,
        } => {
            let ident = cik
                .clone()
                .or_else(|| ticker.clone())
                .unwrap_or_else(|| config.analyst.default_ticker.clone());
            let query = query_from(filter, &config)?;
            let client = edgar_client(&config, &args)?;

            handle_fetch(&client, &ident, &query, *json).await?;
        }

        Command::Summarize {
            input,
            top_k,
            format,
        } => {
            handle_summarize(input, top_k.unwrap_or(config.analyst.top_k), *format)?;
        }

        Command::Trader => {
            let path = report::trader::render_report(&site)?;
            println!("[finops] ✓ Wrote report: {}", path.display());
        }

        Command::Publish { module } => {
            handle_publish(&config, &args, &site, *module).await?;
        }

        // Handled before logging is set up
        Command::Config { .. } => {}
    }

    Ok(())
}

async fn handle_fetch(
    client: &EdgarClient,
    ident: &str,
    query: &models::FilingQuery,
    json: bool,
) -> Result<()> {
    if !json {
        println!("📥 Fetching latest {} for {}", query.forms.join("/"), ident);
    }

    let Some(meta) = client.latest_filing_meta(ident, query).await? else {
        anyhow::bail!("No {} filings found for {}", query.forms.join("/"), ident);
    };

    let (path, html) = client.download_primary_document(&meta).await?;
    print!("{}", fetch_output(&meta, &path, html.len(), json)?);

    Ok(())
}

/// Stdout for `fetch`; JSON mode prints nothing but the document.
fn fetch_output(meta: &models::FilingMeta, path: &Path, bytes: usize, json: bool) -> Result<String> {
    if json {
        let output = serde_json::json!({
            "filing": meta,
            "localPath": path,
            "bytes": bytes,
        });
        return Ok(format!("{}\n", serde_json::to_string_pretty(&output)?));
    }

    let mut out = String::new();
    out.push_str(&format!("   Form:        {}\n", meta.form));
    out.push_str(&format!(
        "   Filing Date: {}\n",
        meta.filing_date.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!(
        "   Report Date: {}\n",
        meta.report_date.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!("   Accession:   {}\n", meta.accession_number));
    out.push_str(&format!("   SEC:         {}\n", meta.filing_detail_url));
    out.push_str(&format!("\n✅ Saved {} bytes to {}\n", bytes, path.display()));
    Ok(out)
}

fn handle_summarize(input: &Path, top_k: usize, format: OutputFormat) -> Result<()> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read filing: {}", input.display()))?;
    let html = String::from_utf8_lossy(&bytes);

    let sections = analysis::extract_section_texts(&html);
    let highlights = analysis::highlights(&sections, top_k);

    print!("{}", summary_output(&highlights, format)?);
    Ok(())
}

fn summary_output(highlights: &models::Highlights, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(highlights)?));
    }

    let mut out = String::new();
    for (title, items) in [
        ("MD&A — Highlights", &highlights.mdna),
        ("Risk Factors — Highlights", &highlights.risk),
    ] {
        out.push_str(title);
        out.push('\n');
        if items.is_empty() {
            out.push_str("  (no highlights found)\n");
        }
        for item in items {
            out.push_str(&format!("  - {}\n", item));
        }
        out.push('\n');
    }
    Ok(out)
}

async fn handle_publish(config: &Config, args: &Args, site: &SiteContext, module: Module) -> Result<()> {
    let path = match module {
        Module::Analyst => {
            let client = edgar_client(config, args)?;
            let options = AnalystOptions {
                query: query_from(&FilingFilter::default(), config)?,
                top_k: config.analyst.top_k,
            };
            report::analyst::render_report(
                &client,
                site,
                &config.analyst.default_ticker,
                &options,
            )
            .await?
        }
        Module::Trader => report::trader::render_report(site)?,
    };
    debug!("Rendered {}", path.display());

    let dst = publish::copy_module_docs(site, module)?;
    println!("[publish] Published {} → {}", module, dst.display());
    Ok(())
}

/// Handle `config show` and `config init`.
fn handle_config(args: &Args, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = Path::new(CONFIG_FILE_NAME);

            if path.exists() {
                eprintln!(
                    "⚠️  {} already exists. Remove it first or edit it manually.",
                    CONFIG_FILE_NAME
                );
                std::process::exit(1);
            }

            std::fs::write(path, Config::default_toml())
                .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

            println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
            println!("   Edit it to set your SEC contact email, default ticker and more.");
        }
        ConfigAction::Show { as_json } => {
            let config = load_config(args)?;
            if *as_json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("# Effective FinOps configuration");
                println!("# User-Agent: {}\n", config.sec.user_agent());
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{FilingMeta, Highlights};

    fn sample_meta() -> FilingMeta {
        FilingMeta {
            ticker: "AAPL".to_string(),
            cik: "0000320193".to_string(),
            form: "10-K".to_string(),
            filing_date: Some("2023-11-03".to_string()),
            report_date: None,
            accession_number: "0000320193-23-000106".to_string(),
            primary_document: Some("aapl-20230930.htm".to_string()),
            filing_detail_url: "https://www.sec.gov/Archives/edgar/data/320193/000032019323000106/"
                .to_string(),
        }
    }

    #[test]
    fn test_summary_json_output_is_pure_json() {
        let highlights = Highlights {
            mdna: vec!["Revenue grew \"strongly\".".to_string()],
            risk: vec![],
        };

        let out = summary_output(&highlights, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["mdna"][0], "Revenue grew \"strongly\".");
        assert!(parsed["risk"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_summary_text_output() {
        let out = summary_output(&Highlights::default(), OutputFormat::Text).unwrap();
        assert!(out.starts_with("MD&A — Highlights\n  (no highlights found)\n"));
        assert!(out.contains("Risk Factors — Highlights"));
    }

    #[test]
    fn test_fetch_json_output_is_pure_json() {
        let out = fetch_output(&sample_meta(), Path::new("data/filings/x.htm"), 42, true).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["bytes"], 42);
        assert_eq!(parsed["localPath"], "data/filings/x.htm");
        assert_eq!(parsed["filing"]["accessionNumber"], "0000320193-23-000106");
    }

    #[test]
    fn test_fetch_text_output() {
        let out = fetch_output(&sample_meta(), Path::new("x.htm"), 7, false).unwrap();
        assert!(out.contains("Report Date: -"));
        assert!(out.contains("Saved 7 bytes to x.htm"));
        assert!(serde_json::from_str::<serde_json::Value>(&out).is_err());
    }
}
