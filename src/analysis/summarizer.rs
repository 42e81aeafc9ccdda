//! Extractive TF-IDF summarizer.
//!
//! Each sentence is treated as a document. A sentence scores the sum of
//! its L2-normalized TF-IDF weights, and the top `k` sentences are kept
//! in their original order.

use crate::analysis::stopwords::is_stop_word;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Vocabulary cap, by corpus term frequency.
pub const MAX_FEATURES: usize = 5000;

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence regex"));
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// Split at whitespace that follows `.`, `!` or `?`.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END.find_iter(text) {
        // The terminator is a single ASCII byte and stays with its sentence.
        let end = m.start() + 1;
        sentences.push(&text[start..end]);
        start = m.end();
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn tokenize(sentence: &str, remove_stop_words: bool) -> Vec<String> {
    let lower = sentence.to_lowercase();
    TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !(remove_stop_words && is_stop_word(t)))
        .map(String::from)
        .collect()
}

/// Score every sentence, or `None` when the vocabulary is empty.
fn tfidf_scores(sentences: &[String], remove_stop_words: bool) -> Option<Vec<f64>> {
    let docs: Vec<Vec<String>> = sentences
        .iter()
        .map(|s| tokenize(s, remove_stop_words))
        .collect();

    let mut corpus_counts: HashMap<&str, usize> = HashMap::new();
    for token in docs.iter().flatten() {
        *corpus_counts.entry(token.as_str()).or_default() += 1;
    }
    if corpus_counts.is_empty() {
        return None;
    }

    let mut vocab: Vec<(&str, usize)> = corpus_counts.into_iter().collect();
    if vocab.len() > MAX_FEATURES {
        vocab.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        vocab.truncate(MAX_FEATURES);
    }
    let vocab: HashSet<&str> = vocab.into_iter().map(|(t, _)| t).collect();

    let term_counts: Vec<HashMap<&str, usize>> = docs
        .iter()
        .map(|doc| {
            let mut counts = HashMap::new();
            for token in doc.iter().filter(|t| vocab.contains(t.as_str())) {
                *counts.entry(token.as_str()).or_default() += 1;
            }
            counts
        })
        .collect();

    let mut doc_freq: HashMap<&str, usize> = HashMap::new();
    for counts in &term_counts {
        for term in counts.keys() {
            *doc_freq.entry(*term).or_default() += 1;
        }
    }

    // Smoothed idf: ln((1 + n) / (1 + df)) + 1
    let n = sentences.len() as f64;
    let idf = |term: &str| {
        let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
        ((1.0 + n) / (1.0 + df)).ln() + 1.0
    };

    let scores = term_counts
        .iter()
        .map(|counts| {
            let weights: Vec<f64> = counts
                .iter()
                .map(|(term, &tf)| tf as f64 * idf(*term))
                .collect();
            let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
            if norm == 0.0 {
                0.0
            } else {
                weights.iter().sum::<f64>() / norm
            }
        })
        .collect();

    Some(scores)
}

/// Return the `k` most informative sentences of `text`, in original order.
///
/// When stop-word removal leaves no vocabulary (e.g. "One. Two. Three."),
/// scoring is retried with every token kept.
pub fn top_sentences_tfidf(text: &str, k: usize) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let sentences = split_sentences(text);
    if sentences.len() <= k {
        return sentences;
    }

    let scores = tfidf_scores(&sentences, true)
        .or_else(|| {
            debug!("Empty vocabulary after stop-word removal; retrying without stop words");
            tfidf_scores(&sentences, false)
        })
        .unwrap_or_else(|| vec![0.0; sentences.len()]);

    let mut ranked: Vec<usize> = (0..sentences.len()).collect();
    // Stable sort: ties keep the earlier sentence.
    ranked.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(k);
    ranked.sort_unstable();

    ranked.into_iter().map(|i| sentences[i].clone()).collect()
}
