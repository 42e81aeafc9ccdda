//! Shared HTML page shell.
//!
//! Every module supplies only its body; the header, navigation, styles
//! and footer are rendered here.

use super::SiteContext;
use anyhow::{Context, Result};
use chrono::Utc;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::path::PathBuf;
use tracing::debug;

const STYLE: &str = r#"
    :root { --bg:#fff; --fg:#111; --muted:#666; --border:#eee; --link:#0b5bd3; }
    * { box-sizing: border-box; }
    body { background:var(--bg); color:var(--fg); font-family: system-ui, Arial, sans-serif; margin: 2rem; line-height:1.5; }
    header, footer { color:var(--muted); }
    a { color:var(--link); text-decoration:none; }
    a:hover { text-decoration:underline; }
    .card { border:1px solid var(--border); border-radius:12px; padding:1rem; box-shadow:0 1px 2px rgba(0,0,0,.04); }
    table { border-collapse: collapse; width:100%; }
    td, th { border: 1px solid var(--border); padding: .6rem .8rem; text-align:left; }
    .kpi { display:flex; gap:1rem; flex-wrap:wrap; }
    .kpi > div { border:1px solid var(--border); border-radius:10px; padding:.6rem .8rem; min-width: 160px; }
"#;

/// Uppercase the first character: `analyst` -> `Analyst`.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn navigation(nav_modules: &[String]) -> Markup {
    html! {
        nav style="margin-bottom:1rem;" {
            a href="../" { "Home" }
            @for module in nav_modules {
                " | "
                a href={ "../" (module) "/" } { (capitalize(module)) }
            }
        }
    }
}

/// Render a complete page around `body`.
pub fn render_html(page_title: &str, body: Markup, nav_modules: &[String]) -> String {
    let updated = Utc::now().format("%Y-%m-%d %H:%M UTC").to_string();

    let page = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (page_title) " · FinOps Platform" }
                meta name="viewport" content="width=device-width, initial-scale=1";
                style { (PreEscaped(STYLE)) }
            }
            body {
                header {
                    h1 { "FinOps Platform" }
                    (navigation(nav_modules))
                }
                main class="card" {
                    (body)
                }
                footer {
                    p style="margin-top:1rem;" { "Last updated: " (updated) }
                }
            }
        }
    };

    page.into_string()
}

/// Write `<root>/<module_slug>/docs/index.html` and return its path.
pub fn render_page(
    site: &SiteContext,
    module_slug: &str,
    page_title: &str,
    body: Markup,
) -> Result<PathBuf> {
    let out_dir = site.root.join(module_slug).join("docs");
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let out_path = out_dir.join("index.html");
    let content = render_html(page_title, body, &site.nav_modules);
    std::fs::write(&out_path, content)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    debug!("Wrote page {}", out_path.display());
    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(root: &std::path::Path) -> SiteContext {
        SiteContext {
            root: root.to_path_buf(),
            nav_modules: vec!["analyst".to_string(), "trader".to_string()],
        }
    }

    #[test]
    fn test_render_page_creates_file_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = render_page(
            &site(dir.path()),
            "testmodule",
            "Test Report",
            html! { p { "Hello World" } },
        )
        .unwrap();

        assert_eq!(path, dir.path().join("testmodule").join("docs").join("index.html"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
        assert!(content.contains("<p>Hello World</p>"));
        assert!(content.contains("<title>Test Report · FinOps Platform</title>"));
        assert!(content.contains(r#"<a href="../analyst/">Analyst</a>"#));
        assert!(content.contains(r#"<a href="../trader/">Trader</a>"#));
        assert!(content.contains("Last updated: "));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = render_html("R&D <beta>", html! {}, &[]);
        assert!(html.contains("R&amp;D &lt;beta&gt;"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("analyst"), "Analyst");
        assert_eq!(capitalize(""), "");
    }
}
