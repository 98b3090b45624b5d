//! Retriever — pluggable answer backend behind a trait.
//!
//! Default: `KeywordRetriever` (fact extractors, then passage scoring). Pure Rust,
//! deterministic, no model to load.
//!
//! `AppState` holds an `Arc<dyn Retriever>`.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::qa::corpus::Corpus;
use crate::qa::facts::{extract_facts, FactKind};
use crate::qa::passages::score_passages;
use crate::qa::QaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMethod {
    Fact(FactKind),
    Passage,
}

/// Snippets judged relevant to one question, best first. Empty means no match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Retrieval {
    pub method: RetrievalMethod,
    pub snippets: Vec<String>,
}

#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, question: &str) -> Result<Retrieval, QaError>;
}

/// Keyword retriever over a fixed corpus.
#[derive(Debug, Clone)]
pub struct KeywordRetriever {
    corpus: Corpus,
    window_size: usize,
    max_passages: usize,
}

impl KeywordRetriever {
    pub fn new(corpus: Corpus, window_size: usize, max_passages: usize) -> Self {
        Self {
            corpus,
            window_size,
            max_passages,
        }
    }

    /// Fact extraction first; passage scoring only when no fact rule answers.
    pub fn top_passages(&self, question: &str) -> Result<Retrieval, QaError> {
        if let Some(fact) = extract_facts(question, self.corpus.text())? {
            return Ok(Retrieval {
                method: RetrievalMethod::Fact(fact.kind),
                snippets: fact.values,
            });
        }

        let scored = score_passages(question, self.corpus.text(), self.window_size)?;
        let snippets = scored
            .into_iter()
            .take(self.max_passages)
            .inspect(|p| debug!(start_idx = p.start_idx, score = p.score, "Selected passage"))
            .map(|p| p.text.trim().to_string())
            .collect();

        Ok(Retrieval {
            method: RetrievalMethod::Passage,
            snippets,
        })
    }
}

impl Default for KeywordRetriever {
    fn default() -> Self {
        Self::new(Corpus::resume(), 2, 3)
    }
}

#[async_trait]
impl Retriever for KeywordRetriever {
    async fn retrieve(&self, question: &str) -> Result<Retrieval, QaError> {
        self.top_passages(question)
    }
}
