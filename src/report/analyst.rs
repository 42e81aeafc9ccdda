//! Analyst module report.
//!
//! Latest filing lookup, section extraction and TF-IDF highlights,
//! rendered into the shared page shell.

use super::{template::render_page, SiteContext};
use crate::analysis::{extract_section_texts, highlights};
use crate::edgar::EdgarClient;
use crate::models::{FilingMeta, FilingQuery, Highlights, Module};
use anyhow::{Context, Result};
use maud::{html, Markup};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Options for one Analyst run.
#[derive(Debug, Clone)]
pub struct AnalystOptions {
    pub query: FilingQuery,
    /// Highlight sentences per section.
    pub top_k: usize,
}

fn page_title(ticker: &str) -> String {
    format!("Analyst Report · {}", ticker.to_uppercase())
}

/// Body shown when the company has no matching filing.
pub fn not_found_body(ticker: &str) -> Markup {
    html! {
        h2 { "Analyst Module" }
        p {
            "Could not find SEC filings for "
            strong { (ticker.to_uppercase()) }
            "."
        }
    }
}

fn highlight_list(items: &[String]) -> Markup {
    html! {
        @if items.is_empty() {
            em { "No highlights found." }
        } @else {
            ul {
                @for item in items {
                    li { (item) }
                }
            }
        }
    }
}

/// Body for a filing with its section highlights.
pub fn filing_body(meta: &FilingMeta, highlights: &Highlights, local_path: &Path) -> Markup {
    let or_empty = |v: &Option<String>| v.clone().unwrap_or_default();

    html! {
        h2 { "Analyst · " (meta.ticker) }
        div class="kpi" {
            div { strong { "Form:" } " " (meta.form) }
            div { strong { "Filing Date:" } " " (or_empty(&meta.filing_date)) }
            div { strong { "Report Date:" } " " (or_empty(&meta.report_date)) }
            div { strong { "Accession:" } " " (meta.accession_number) }
        }
        p style="margin-top:1rem;" {
            a href=(meta.filing_detail_url) target="_blank" rel="noopener" { "View filing on SEC" }
        }

        h3 style="margin-top:1.25rem;" { "MD&A — Highlights" }
        (highlight_list(&highlights.mdna))

        h3 style="margin-top:1.25rem;" { "Risk Factors — Highlights" }
        (highlight_list(&highlights.risk))

        details style="margin-top:1rem;" {
            summary { "Local cache" }
            p {
                "Saved primary document: "
                code { (local_path.display().to_string()) }
            }
        }
    }
}

/// Fetch, analyze and render the Analyst report for `ticker`.
pub async fn render_report(
    client: &EdgarClient,
    site: &SiteContext,
    ticker: &str,
    options: &AnalystOptions,
) -> Result<PathBuf> {
    let title = page_title(ticker);

    let meta = client
        .latest_filing_meta(ticker, &options.query)
        .await
        .with_context(|| format!("Failed to look up filings for {}", ticker))?;

    let Some(meta) = meta else {
        warn!("No SEC filings found for {}", ticker);
        return render_page(site, Module::Analyst.slug(), &title, not_found_body(ticker));
    };

    let (local_path, html) = client
        .download_primary_document(&meta)
        .await
        .context("Failed to download primary document")?;

    let sections = extract_section_texts(&html);
    info!(
        "Extracted sections: MD&A {} chars, Risk Factors {} chars",
        sections.mdna.len(),
        sections.risk.len()
    );

    let highlights = highlights(&sections, options.top_k);
    let body = filing_body(&meta, &highlights, &local_path);

    render_page(site, Module::Analyst.slug(), &title, body)
}
