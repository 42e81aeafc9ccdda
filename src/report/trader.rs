//! Trader module report (placeholder status page).

use super::{template::render_page, SiteContext};
use crate::models::Module;
use anyhow::Result;
use maud::html;
use std::path::PathBuf;

pub fn render_report(site: &SiteContext) -> Result<PathBuf> {
    let body = html! {
        h2 { "Trader Module" }
        p { "Status: OK — placeholder report" }
        ul {
            li { "Next: pull prices" }
            li { "Plot 6M chart" }
            li { "Add basic strategy stats" }
        }
    };

    render_page(site, Module::Trader.slug(), "Trader Report", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trader_report() {
        let dir = tempfile::tempdir().unwrap();
        let site = SiteContext {
            root: dir.path().to_path_buf(),
            nav_modules: vec!["analyst".to_string(), "trader".to_string()],
        };

        let path = render_report(&site).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("Trader Module"));
        assert!(content.contains("placeholder report"));
        assert!(content.contains("<title>Trader Report · FinOps Platform</title>"));
    }
}
