//! The resume text the retriever answers from.
//!
//! Embedded at build time and never mutated. The fact extractors are tuned to literal
//! values in this file (e.g. "81.29%", "May 2026"), so edits to it are versioned
//! together with `facts.rs`.

const RESUME_TEXT: &str = include_str!("../../corpus/resume.txt");

/// Read-only knowledge source shared by every query.
#[derive(Debug, Clone, Copy)]
pub struct Corpus {
    text: &'static str,
}

impl Corpus {
    /// The embedded resume.
    pub fn resume() -> Self {
        Self { text: RESUME_TEXT }
    }

    /// Wraps arbitrary static text. Used by tests that need a small fixture.
    #[cfg(test)]
    pub fn from_static(text: &'static str) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &'static str {
        self.text
    }
}

impl Default for Corpus {
    fn default() -> Self {
        Self::resume()
    }
}
