//! Passage scorer — sliding windows of sentences ranked against query terms.
//!
//! Scoring per passage (case-insensitive substring containment):
//! - +3 per distinct phrase
//! - +1 per distinct token
//! - +2 when phrase and token hits together exceed 3
//! - +1 per each of the first three query words that opens the passage or appears
//!   surrounded by spaces
//!
//! Everything here is recomputed per call. Nothing is cached between queries.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::qa::terms::{extract_query_terms, QueryTerms};
use crate::qa::QaError;

const PHRASE_WEIGHT: u32 = 3;
const TOKEN_WEIGHT: u32 = 1;
const MULTI_MATCH_THRESHOLD: usize = 3;
const MULTI_MATCH_BONUS: u32 = 2;
const QUESTION_WORD_BONUS: u32 = 1;
const QUESTION_WORDS_CONSIDERED: usize = 3;

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("sentence break regex is valid"));
static NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").expect("newline regex is valid"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// A window of consecutive sentences with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPassage {
    pub start_idx: usize,
    pub text: String,
    pub score: u32,
}

/// Splits text into trimmed, non-empty sentences. Terminal punctuation stays with its
/// sentence; a break needs whitespace after the punctuation, so figures like "81.29%"
/// stay whole.
pub fn split_sentences(text: &str) -> Vec<String> {
    let flattened = NEWLINES.replace_all(text, " ");

    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_BREAK.find_iter(&flattened) {
        // punctuation is one ASCII byte
        sentences.push(&flattened[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&flattened[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// One passage per sentence index, each joining up to `window_size` sentences.
/// Trailing windows are shorter when they run past the end.
pub fn build_passages(sentences: &[String], window_size: usize) -> Vec<(usize, String)> {
    (0..sentences.len())
        .map(|i| {
            let end = (i + window_size).min(sentences.len());
            (i, sentences[i..end].join(" "))
        })
        .collect()
}

/// The first three whitespace-separated pieces of the lowercased question.
pub fn question_words(question: &str) -> Vec<String> {
    WHITESPACE
        .split(&question.to_lowercase())
        .take(QUESTION_WORDS_CONSIDERED)
        .map(str::to_string)
        .collect()
}

/// Scores one passage. `lower` must already be lowercased.
pub fn score_text(lower: &str, terms: &QueryTerms, question_words: &[String]) -> u32 {
    let phrase_hits = terms
        .phrases
        .iter()
        .filter(|p| lower.contains(p.as_str()))
        .count();
    let token_hits = terms
        .tokens
        .iter()
        .filter(|t| lower.contains(t.as_str()))
        .count();

    let mut score = phrase_hits as u32 * PHRASE_WEIGHT + token_hits as u32 * TOKEN_WEIGHT;

    if phrase_hits + token_hits > MULTI_MATCH_THRESHOLD {
        score += MULTI_MATCH_BONUS;
    }

    for word in question_words {
        if lower.starts_with(word.as_str()) || lower.contains(&format!(" {word} ")) {
            score += QUESTION_WORD_BONUS;
        }
    }

    score
}

/// Scores every passage of `text` against `question` and returns the non-zero ones,
/// highest first. Equal scores keep corpus order.
pub fn score_passages(
    question: &str,
    text: &str,
    window_size: usize,
) -> Result<Vec<ScoredPassage>, QaError> {
    if window_size == 0 {
        return Err(QaError::InvalidWindowSize(window_size));
    }

    let terms = extract_query_terms(question);
    tracing::debug!(
        tokens = ?terms.tokens,
        phrases = ?terms.phrases,
        "Extracted query terms"
    );

    let words = question_words(question);
    let sentences = split_sentences(text);

    let mut scored: Vec<ScoredPassage> = build_passages(&sentences, window_size)
        .into_iter()
        .map(|(start_idx, text)| {
            let score = score_text(&text.to_lowercase(), &terms, &words);
            ScoredPassage {
                start_idx,
                text,
                score,
            }
        })
        .filter(|p| p.score > 0)
        .collect();

    // stable: ties stay in corpus order
    scored.sort_by(|a, b| b.score.cmp(&a.score));

    Ok(scored)
}
