//! Answer formatter — turns retrieved snippets into renderable segments plus a
//! "Sources" trailer of site pages.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Character budget for a lone answer.
pub const SINGLE_BUDGET: usize = 500;
/// Character budget for each item of a multi-part answer.
pub const MULTIPLE_BUDGET: usize = 300;
const ELLIPSIS: char = '…';

/// Keyword group → site page. Order here is the order sources are listed.
const SOURCE_GROUPS: &[(&str, &str, &[&str])] = &[
    (
        "projects.html",
        "Projects",
        &[
            "project", "canvas", "emotion", "e-ink", "calendar", "raster", "graphics", "speech",
            "c++",
        ],
    ),
    (
        "experience.html",
        "Experience",
        &[
            "census", "automation", "engineer", "experience", "work", "employment", "ticket",
            "device",
        ],
    ),
    (
        "coursework.html",
        "Coursework",
        &["education", "degree", "university", "vermont", "coursework", "graduate"],
    ),
    ("resume.html", "Resume", &["resume", "cv"]),
    (
        "contact.html",
        "Contact",
        &["email", "contact", "phone", "linkedin", "github"],
    ),
];

static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://[^\s]+|[\w-]+\.html|[\w.-]+@[\w.-]+\.\w+").expect("link regex is valid")
});

/// What the retriever hands to the formatter. Decided once from the snippet count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Answer {
    Single(String),
    Multiple(Vec<String>),
}

impl Answer {
    /// `None` for an empty list, `Single` for one snippet, `Multiple` otherwise.
    pub fn from_snippets(mut snippets: Vec<String>) -> Option<Self> {
        match snippets.len() {
            0 => None,
            1 => snippets.pop().map(Answer::Single),
            _ => Some(Answer::Multiple(snippets)),
        }
    }

    fn joined(&self) -> String {
        match self {
            Answer::Single(text) => text.clone(),
            Answer::Multiple(items) => items.join(" "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    pub url: String,
    pub label: String,
}

/// A run of answer text, either plain or clickable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Text { content: String },
    Link { content: String, href: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerBody {
    Single { segments: Vec<Segment> },
    Multiple { items: Vec<Vec<Segment>> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedAnswer {
    pub body: AnswerBody,
    pub sources: Vec<SourceLink>,
}

/// Renders an answer. Without explicit `sources` they are inferred from the untruncated
/// answer text, then from `question`.
pub fn format_answer(
    answer: &Answer,
    sources: Option<Vec<SourceLink>>,
    question: Option<&str>,
) -> RenderedAnswer {
    let sources = sources.unwrap_or_else(|| {
        let mut links = infer_sources(&answer.joined());
        if let Some(question) = question {
            links.extend(infer_sources(question));
        }
        dedup_sources(links)
    });

    let body = match answer {
        Answer::Single(text) => AnswerBody::Single {
            segments: linkify(&truncate(text, SINGLE_BUDGET)),
        },
        Answer::Multiple(items) => AnswerBody::Multiple {
            items: items
                .iter()
                .map(|item| linkify(&truncate(item, MULTIPLE_BUDGET)))
                .collect(),
        },
    };

    RenderedAnswer { body, sources }
}

/// Site pages whose keyword group appears in `text`.
pub fn infer_sources(text: &str) -> Vec<SourceLink> {
    let lower = text.to_lowercase();
    SOURCE_GROUPS
        .iter()
        .filter(|(_, _, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(url, label, _)| SourceLink {
            url: url.to_string(),
            label: label.to_string(),
        })
        .collect()
}

fn dedup_sources(links: Vec<SourceLink>) -> Vec<SourceLink> {
    let mut unique: Vec<SourceLink> = Vec::with_capacity(links.len());
    for link in links {
        if !unique.iter().any(|seen| seen.url == link.url) {
            unique.push(link);
        }
    }
    unique
}

/// Cuts `text` to `budget` characters plus an ellipsis when it is longer.
pub fn truncate(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(budget).collect();
    cut.push(ELLIPSIS);
    cut
}

/// Splits text into plain and link segments. URLs pass through, `*.html` stays a
/// relative path, addresses get `mailto:`.
pub fn linkify(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for m in LINK.find_iter(text) {
        if m.start() > last {
            segments.push(Segment::Text {
                content: text[last..m.start()].to_string(),
            });
        }
        let content = m.as_str().to_string();
        let href = if content.starts_with("http") || !content.contains('@') {
            content.clone()
        } else {
            format!("mailto:{content}")
        };
        segments.push(Segment::Link { content, href });
        last = m.end();
    }

    if last < text.len() {
        segments.push(Segment::Text {
            content: text[last..].to_string(),
        });
    }

    if segments.is_empty() {
        segments.push(Segment::Text {
            content: text.to_string(),
        });
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(content: &str, href: &str) -> Segment {
        Segment::Link {
            content: content.to_string(),
            href: href.to_string(),
        }
    }

    fn text(content: &str) -> Segment {
        Segment::Text {
            content: content.to_string(),
        }
    }

    fn urls(sources: &[SourceLink]) -> Vec<&str> {
        sources.iter().map(|s| s.url.as_str()).collect()
    }

    #[test]
    fn test_email_becomes_mailto_link() {
        assert_eq!(
            linkify("workwilliamsander@gmail.com"),
            vec![link(
                "workwilliamsander@gmail.com",
                "mailto:workwilliamsander@gmail.com"
            )]
        );
    }

    #[test]
    fn test_html_path_stays_relative() {
        assert_eq!(linkify("resume.html"), vec![link("resume.html", "resume.html")]);
    }

    #[test]
    fn test_full_url_passes_through_with_surrounding_text() {
        assert_eq!(
            linkify("See https://example.com/a?b=1 for more"),
            vec![
                text("See "),
                link("https://example.com/a?b=1", "https://example.com/a?b=1"),
                text(" for more"),
            ]
        );
    }

    #[test]
    fn test_plain_text_is_one_segment() {
        assert_eq!(linkify("no links here"), vec![text("no links here")]);
        assert_eq!(linkify(""), vec![text("")]);
    }

    #[test]
    fn test_truncate_within_budget_is_unchanged() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn test_truncate_counts_characters() {
        let long = "é".repeat(12);
        let cut = truncate(&long, 10);
        assert_eq!(cut.chars().count(), 11);
        assert!(cut.ends_with('…'));
        assert!(cut.starts_with(&"é".repeat(10)));
    }

    #[test]
    fn test_single_answer_uses_500_budget() {
        let answer = Answer::Single("a".repeat(600));
        let rendered = format_answer(&answer, Some(vec![]), None);
        match rendered.body {
            AnswerBody::Single { segments } => {
                assert_eq!(segments, vec![text(&format!("{}…", "a".repeat(500)))]);
            }
            other => panic!("expected single body, got {other:?}"),
        }
    }

    #[test]
    fn test_multiple_answer_uses_300_budget_each() {
        let answer = Answer::Multiple(vec!["b".repeat(400), "short".to_string()]);
        let rendered = format_answer(&answer, Some(vec![]), None);
        match rendered.body {
            AnswerBody::Multiple { items } => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0], vec![text(&format!("{}…", "b".repeat(300)))]);
                assert_eq!(items[1], vec![text("short")]);
            }
            other => panic!("expected multiple body, got {other:?}"),
        }
    }

    #[test]
    fn test_sources_inferred_and_deduplicated() {
        let sources = dedup_sources(
            [
                infer_sources("C++ project at the Census Bureau"),
                infer_sources("another project"),
            ]
            .concat(),
        );
        assert_eq!(urls(&sources), vec!["projects.html", "experience.html"]);
    }

    #[test]
    fn test_question_contributes_sources_after_answer() {
        let answer = Answer::Single("workwilliamsander@gmail.com".to_string());
        let rendered = format_answer(&answer, None, Some("What is Will's email?"));
        assert!(urls(&rendered.sources).contains(&"contact.html"));
    }

    #[test]
    fn test_explicit_sources_are_not_replaced() {
        let explicit = vec![SourceLink {
            url: "resume.html".to_string(),
            label: "Resume".to_string(),
        }];
        let answer = Answer::Single("C++ project".to_string());
        let rendered = format_answer(&answer, Some(explicit.clone()), None);
        assert_eq!(rendered.sources, explicit);
    }

    #[test]
    fn test_answer_from_snippets() {
        assert_eq!(Answer::from_snippets(vec![]), None);
        assert_eq!(
            Answer::from_snippets(vec!["one".to_string()]),
            Some(Answer::Single("one".to_string()))
        );
        assert!(matches!(
            Answer::from_snippets(vec!["a".to_string(), "b".to_string()]),
            Some(Answer::Multiple(items)) if items.len() == 2
        ));
    }
}
