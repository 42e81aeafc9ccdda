//! Text analysis of filings.
//!
//! Section extraction from filing HTML and extractive summarization.

pub mod sections;
pub mod stopwords;
pub mod summarizer;

pub use sections::extract_section_texts;
pub use summarizer::top_sentences_tfidf;

use crate::models::{Highlights, SectionTexts};

/// Summarize both sections down to `k` sentences each.
pub fn highlights(sections: &SectionTexts, k: usize) -> Highlights {
    Highlights {
        mdna: top_sentences_tfidf(&sections.mdna, k),
        risk: top_sentences_tfidf(&sections.risk, k),
    }
}
