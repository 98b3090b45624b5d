// Portfolio Q&A: answers free-text questions from the embedded resume.
// Fact extractors run first; passage scoring is the fallback.
// No model, no index: everything derived from the corpus is rebuilt per query.

pub mod corpus;
pub mod facts;
pub mod formatter;
pub mod handlers;
pub mod passages;
pub mod retriever;
pub mod session;
pub mod terms;

use thiserror::Error;

pub use retriever::{KeywordRetriever, Retriever};
pub use session::QaController;

#[derive(Debug, Error)]
pub enum QaError {
    #[error("Window size must be at least 1 (got {0})")]
    InvalidWindowSize(usize),

    #[error("Invalid match pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Q&A has not been enabled")]
    Disabled,

    #[error("A question is already being answered")]
    Busy,
}
