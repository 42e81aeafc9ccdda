//! Section extraction from filing HTML.
//!
//! Filings are not structurally marked up, so sections are located by
//! heading text and collected up to the next heading.

use crate::models::SectionTexts;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").expect("valid heading selector"));

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Collapse runs of whitespace into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of an element: trimmed text nodes joined with spaces.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_heading(element: &ElementRef<'_>) -> bool {
    HEADING_TAGS.contains(&element.value().name())
}

/// Text of the siblings after `start`, up to the next heading.
fn collect_until_next_heading(start: Option<ElementRef<'_>>) -> String {
    let Some(start) = start else {
        return String::new();
    };

    let mut parts = Vec::new();
    for sibling in start.next_siblings() {
        if let Some(element) = ElementRef::wrap(sibling) {
            if is_heading(&element) {
                break;
            }
            parts.push(element_text(element));
        } else if let Node::Text(text) = sibling.value() {
            parts.push(text.trim().to_string());
        }
    }

    collapse_whitespace(&parts.join(" "))
}

/// Isolate MD&A (Item 7) and Risk Factors (Item 1A) from filing HTML.
///
/// Missing sections come back as empty strings.
pub fn extract_section_texts(html: &str) -> SectionTexts {
    let document = Html::parse_document(html);

    let mut mdna_start = None;
    let mut risk_start = None;

    for heading in document.select(&HEADING_SELECTOR) {
        let upper = collapse_whitespace(&element_text(heading)).to_uppercase();

        if mdna_start.is_none() && upper.contains("ITEM 7") && upper.contains("MANAGEMENT") {
            mdna_start = Some(heading);
        }
        if risk_start.is_none() && upper.contains("ITEM 1A") && upper.contains("RISK") {
            risk_start = Some(heading);
        }
    }

    SectionTexts {
        mdna: collect_until_next_heading(mdna_start),
        risk: collect_until_next_heading(risk_start),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILING: &str = r#"
    <html><body>
      <h2>Item 7. Management's Discussion and Analysis</h2>
      <p>Revenue increased due to new products.</p>
      <p>Margins improved year over year.</p>

      <h2>Item 1A. Risk Factors</h2>
      <p>Supply chain disruptions may impact deliveries.</p>
      <p>Foreign exchange volatility is a risk.</p>
    </body></html>
    "#;

    #[test]
    fn test_extract_basic_sections() {
        let sections = extract_section_texts(FILING);
        assert_eq!(
            sections.mdna,
            "Revenue increased due to new products. Margins improved year over year."
        );
        assert!(sections.risk.contains("Supply chain disruptions"));
        assert!(sections.risk.contains("Foreign exchange volatility"));
        assert!(!sections.mdna.contains("Supply chain"));
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let sections = extract_section_texts("<html><body><h1>Cover</h1><p>Hi</p></body></html>");
        assert_eq!(sections, SectionTexts::default());
    }

    #[test]
    fn test_heading_matching_is_case_and_space_insensitive() {
        let html = r#"<body>
            <h3>ITEM&nbsp;1A.
                risk   factors</h3>
            <div>Competition is <b>intense</b>.</div>
            loose text
            <h3>Item 1B. Unresolved Staff Comments</h3>
            <p>None.</p>
        </body>"#;
        let sections = extract_section_texts(html);
        assert_eq!(sections.risk, "Competition is intense . loose text");
        assert!(sections.mdna.is_empty());
    }

    #[test]
    fn test_first_matching_heading_wins() {
        let html = r#"<body>
            <h2>Item 7. Management's Discussion</h2><p>First.</p>
            <h2>Item 7. Management's Discussion (continued)</h2><p>Second.</p>
        </body>"#;
        assert_eq!(extract_section_texts(html).mdna, "First.");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
        assert_eq!(collapse_whitespace(""), "");
    }
}
