//! Query term extraction: phrase patterns, stop-word filtering, synonym expansion.
//!
//! All matching tables are plain data so they can be tested without the scorer.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Phrase pattern → synonyms added whenever the pattern matches anywhere in the query.
/// Patterns are unanchored substrings: `ml` also fires inside `html`.
const PHRASE_TABLE: &[(&str, &[&str])] = &[
    ("machine learning|ml", &["ml", "deep learning", "neural network"]),
    ("speech emotion|emotion recognition", &["emotion", "ser"]),
    ("census bureau|census", &["us census", "federal"]),
    ("computer science|cs", &["cs", "computer science"]),
    ("software engineering|software engineer", &["software", "engineering"]),
    ("work authorization|visa", &["authorization", "sponsorship"]),
    ("email|contact", &["e-mail", "email address"]),
    ("degree|graduate|graduation", &["education", "bachelor"]),
    ("experience|work|employment", &["job", "worked", "employer"]),
    ("project|projects", &["work", "build"]),
    ("accuracy|performance", &["result", "score"]),
    ("programming languages?|languages?", &["language", "tech"]),
    ("resume|cv|curriculum vitae", &["resume", "cv", "resumé"]),
];

const TOKEN_SYNONYMS: &[(&str, &[&str])] = &[
    ("will", &["william", "williams"]),
    ("william", &["will", "williams"]),
    ("email", &["contact", "e-mail"]),
    ("work", &["employment", "job", "experience", "worked"]),
    ("experience", &["work", "employment", "job"]),
    ("project", &["projects", "work"]),
    ("degree", &["education", "graduate", "graduation"]),
    ("graduate", &["degree", "graduation"]),
    ("languages", &["language", "programming"]),
    ("python", &["py"]),
    ("c++", &["cpp", "c plus plus"]),
    ("accuracy", &["performance", "result"]),
    ("census", &["census bureau", "us census"]),
    ("resume", &["cv", "curriculum vitae", "resume", "resumé"]),
];

const STOP_WORDS: &[&str] = &[
    "the", "is", "are", "was", "were", "what", "where", "when", "who", "how", "does", "do",
    "did", "would", "can", "could", "should", "may", "might", "a", "an", "and", "or", "but",
    "for", "with", "from", "about", "have", "has", "had",
];

struct PhrasePattern {
    regex: Regex,
    synonyms: &'static [&'static str],
}

static PHRASE_PATTERNS: Lazy<Vec<PhrasePattern>> = Lazy::new(|| {
    PHRASE_TABLE
        .iter()
        .map(|&(pattern, synonyms)| PhrasePattern {
            regex: Regex::new(pattern).expect("phrase patterns are valid regexes"),
            synonyms,
        })
        .collect()
});

/// Matching units derived from one question. Both lists are deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryTerms {
    pub tokens: Vec<String>,
    pub phrases: Vec<String>,
}

/// Extracts phrases and tokens from a raw question.
pub fn extract_query_terms(question: &str) -> QueryTerms {
    let lower = question.to_lowercase();

    let mut phrases = Vec::new();
    for pattern in PHRASE_PATTERNS.iter() {
        let before = phrases.len();
        phrases.extend(pattern.regex.find_iter(&lower).map(|m| m.as_str().to_string()));
        if phrases.len() > before {
            phrases.extend(pattern.synonyms.iter().map(|s| s.to_string()));
        }
    }

    let mut tokens = Vec::new();
    for token in raw_tokens(&lower) {
        tokens.extend(expand_synonyms(&token));
    }

    QueryTerms {
        tokens: dedup(tokens),
        phrases: dedup(phrases),
    }
}

/// Lowercased words that survive punctuation stripping, the length filter and the
/// stop-word list. `+` is kept so `c++` stays a token.
fn raw_tokens(lower: &str) -> Vec<String> {
    let cleaned: String = lower
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '+' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() > 1 || is_numeric(token))
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// The term itself followed by its fixed synonyms, if any.
pub fn expand_synonyms(term: &str) -> Vec<String> {
    let lower = term.to_lowercase();
    let mut expanded = vec![lower.clone()];
    if let Some((_, synonyms)) = TOKEN_SYNONYMS.iter().find(|(key, _)| *key == lower) {
        expanded.extend(synonyms.iter().map(|s| s.to_string()));
    }
    expanded
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_words_are_dropped() {
        let terms = extract_query_terms("What is the degree?");
        assert!(!terms.tokens.contains(&"what".to_string()));
        assert!(!terms.tokens.contains(&"is".to_string()));
        assert!(!terms.tokens.contains(&"the".to_string()));
        assert!(terms.tokens.contains(&"degree".to_string()));
    }

    #[test]
    fn test_single_letters_dropped_but_digits_kept() {
        let terms = extract_query_terms("Will's 4 class model");
        assert!(!terms.tokens.contains(&"s".to_string()));
        assert!(terms.tokens.contains(&"4".to_string()));
        assert!(terms.tokens.contains(&"class".to_string()));
    }

    #[test]
    fn test_token_synonyms_are_expanded() {
        let terms = extract_query_terms("Does he know python and c++?");
        for expected in ["python", "py", "c++", "cpp", "c plus plus"] {
            assert!(
                terms.tokens.contains(&expected.to_string()),
                "missing token {expected}: {:?}",
                terms.tokens
            );
        }
    }

    #[test]
    fn test_phrase_match_adds_literal_and_synonyms() {
        let terms = extract_query_terms("Tell me about machine learning");
        assert!(terms.phrases.contains(&"machine learning".to_string()));
        assert!(terms.phrases.contains(&"deep learning".to_string()));
        assert!(terms.phrases.contains(&"neural network".to_string()));
    }

    #[test]
    fn test_phrase_patterns_match_inside_words() {
        let terms = extract_query_terms("Where is the html page?");
        assert!(terms.phrases.contains(&"ml".to_string()));
    }

    #[test]
    fn test_terms_are_deduplicated() {
        let terms = extract_query_terms("resume resume cv");
        let resume_count = terms.tokens.iter().filter(|t| *t == "resume").count();
        assert_eq!(resume_count, 1);
        let cv_count = terms.phrases.iter().filter(|p| *p == "cv").count();
        assert_eq!(cv_count, 1);
    }

    #[test]
    fn test_nonsense_query_has_no_phrases() {
        let terms = extract_query_terms("xyzzy quux");
        assert!(terms.phrases.is_empty());
    }

    #[test]
    fn test_empty_query_yields_empty_terms() {
        assert_eq!(extract_query_terms("   "), QueryTerms::default());
    }

    #[test]
    fn test_expand_synonyms_unknown_term_is_identity() {
        assert_eq!(expand_synonyms("Rust"), vec!["rust".to_string()]);
    }
}
