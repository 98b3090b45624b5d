//! Fact extractors — question-shape shortcuts that pull a literal answer straight out of
//! the corpus and bypass passage scoring.
//!
//! Rules are tried in table order. A rule whose trigger fires but whose extraction finds
//! nothing falls through to the next rule.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::qa::QaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    Email,
    Accuracy,
    Graduation,
    WorkTimeframe,
    ResumePointer,
}

/// A literal answer and the rule that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedFact {
    pub kind: FactKind,
    pub values: Vec<String>,
}

/// Trigger = every group must have at least one keyword contained in the question.
struct FactRule {
    kind: FactKind,
    trigger: &'static [&'static [&'static str]],
}

const FACT_RULES: &[FactRule] = &[
    FactRule {
        kind: FactKind::Email,
        trigger: &[&["email", "contact"], &["what", "will", "william"]],
    },
    FactRule {
        kind: FactKind::Accuracy,
        trigger: &[&["accuracy", "percent", "%"]],
    },
    FactRule {
        kind: FactKind::Graduation,
        trigger: &[&["degree", "graduate", "graduation"], &["when"]],
    },
    FactRule {
        kind: FactKind::WorkTimeframe,
        trigger: &[&["work", "employ", "where"], &["2020"]],
    },
    FactRule {
        kind: FactKind::ResumePointer,
        trigger: &[
            &["resume", "cv", "curriculum vitae"],
            &["where", "link", "see", "view"],
        ],
    },
];

/// Per-class accuracy figures reported in the corpus. The figure and its class marker
/// must share a span with no period other than the figure's own decimal point.
struct ClassFigure {
    question_markers: &'static [&'static str],
    figure: &'static str,
    class_marker: &'static str,
}

const CLASS_FIGURES: &[ClassFigure] = &[
    ClassFigure {
        question_markers: &["4", "four"],
        figure: "81.29%",
        class_marker: "4-class|4 class",
    },
    ClassFigure {
        question_markers: &["6", "six"],
        figure: "76.76%",
        class_marker: "6-class|6 class",
    },
];

const MAX_GENERAL_PERCENTAGES: usize = 2;

const GRADUATION_FALLBACK: &str = "B.S. in Computer Science, expected May 2026";
const RESUME_POINTER: &str =
    "Resume available at resume.html. Full resume content is also available in this context.";

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.-]+@[\w.-]+\.\w+").expect("email regex is valid"));
static PERCENTAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\.?\d*%").expect("percentage regex is valid"));
static DEGREE_SPANS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)B\.?S\.?\s+in\s+Computer\s+Science[^.]*May\s+\d{4}",
        r"(?i)Computer\s+Science[^.]*May\s+\d{4}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("degree regex is valid"))
    .collect()
});
static GRADUATION_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"May\s+2026").expect("graduation year regex is valid"));
static WORK_SPANS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)U\.?S\.?\s+Census\s+Bureau[^.]*(?:IT|Automation|Engineer)[^.]*",
        r"(?i)(?:IT|Automation|Engineer)[^.]*Census\s+Bureau[^.]*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("work regex is valid"))
    .collect()
});

/// Runs the fact rules against `question`. `Ok(None)` means no rule produced an answer
/// and the caller should fall back to passage scoring.
pub fn extract_facts(question: &str, corpus: &str) -> Result<Option<ExtractedFact>, QaError> {
    let lower = question.to_lowercase();

    for rule in FACT_RULES {
        if !trigger_fires(rule.trigger, &lower) {
            continue;
        }
        let values = match rule.kind {
            FactKind::Email => extract_email(corpus),
            FactKind::Accuracy => extract_accuracy(&lower, corpus)?,
            FactKind::Graduation => extract_graduation(corpus),
            FactKind::WorkTimeframe => first_span(&WORK_SPANS, corpus).into_iter().collect(),
            FactKind::ResumePointer => vec![RESUME_POINTER.to_string()],
        };
        if !values.is_empty() {
            return Ok(Some(ExtractedFact {
                kind: rule.kind,
                values,
            }));
        }
    }

    Ok(None)
}

fn trigger_fires(groups: &[&[&str]], lower: &str) -> bool {
    groups
        .iter()
        .all(|group| group.iter().any(|keyword| lower.contains(keyword)))
}

fn extract_email(corpus: &str) -> Vec<String> {
    EMAIL
        .find(corpus)
        .map(|m| vec![m.as_str().to_string()])
        .unwrap_or_default()
}

fn extract_accuracy(lower: &str, corpus: &str) -> Result<Vec<String>, QaError> {
    let percentages: Vec<&str> = PERCENTAGE.find_iter(corpus).map(|m| m.as_str()).collect();
    if percentages.is_empty() {
        return Ok(Vec::new());
    }

    for class in CLASS_FIGURES {
        if class.question_markers.iter().any(|m| lower.contains(m)) {
            let span = colocated_figure(class, corpus)?;
            return Ok(vec![span.unwrap_or_else(|| class.figure.to_string())]);
        }
    }

    Ok(percentages
        .into_iter()
        .take(MAX_GENERAL_PERCENTAGES)
        .map(str::to_string)
        .collect())
}

/// Looks for the figure followed by its class marker, then the reverse order.
fn colocated_figure(class: &ClassFigure, corpus: &str) -> Result<Option<String>, QaError> {
    let figure = regex::escape(class.figure);
    let marker = class.class_marker;
    let patterns = [
        format!(r"(?i){figure}[^.]*(?:{marker})[^.]*"),
        format!(r"(?i)(?:{marker})[^.]*{figure}[^.]*"),
    ];

    for pattern in &patterns {
        let regex = Regex::new(pattern)?;
        if let Some(m) = regex.find(corpus) {
            return Ok(Some(m.as_str().trim().to_string()));
        }
    }
    Ok(None)
}

fn extract_graduation(corpus: &str) -> Vec<String> {
    if let Some(span) = first_span(&DEGREE_SPANS, corpus) {
        return vec![span];
    }
    if GRADUATION_YEAR.is_match(corpus) {
        return vec![GRADUATION_FALLBACK.to_string()];
    }
    Vec::new()
}

fn first_span(patterns: &[Regex], corpus: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|p| p.find(corpus))
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qa::corpus::Corpus;

    fn facts(question: &str) -> Option<ExtractedFact> {
        extract_facts(question, Corpus::resume().text()).unwrap()
    }

    #[test]
    fn test_email_question_returns_address() {
        let fact = facts("What is Will's email?").unwrap();
        assert_eq!(fact.kind, FactKind::Email);
        assert_eq!(fact.values, vec!["workwilliamsander@gmail.com".to_string()]);
    }

    #[test]
    fn test_email_needs_person_reference() {
        // "email" alone without what/will/william does not fire the email rule
        assert!(facts("email").is_none());
    }

    #[test]
    fn test_four_class_accuracy_contains_figure() {
        let fact = facts("What accuracy did the 4-class model get?").unwrap();
        assert_eq!(fact.kind, FactKind::Accuracy);
        assert_eq!(fact.values.len(), 1);
        assert!(fact.values[0].contains("81.29%"), "{:?}", fact.values);
    }

    #[test]
    fn test_six_class_accuracy_contains_figure() {
        let fact = facts("accuracy for six classes").unwrap();
        assert!(fact.values[0].contains("76.76%"), "{:?}", fact.values);
    }

    #[test]
    fn test_general_accuracy_returns_first_two_percentages() {
        let fact = facts("What accuracy did the model reach?").unwrap();
        assert_eq!(fact.values, vec!["81.29%".to_string(), "83.63%".to_string()]);
    }

    #[test]
    fn test_colocated_span_is_returned_when_present() {
        let corpus = "Model reached 81.29% on the 4-class split. Other text.";
        let fact = extract_facts("accuracy on 4 classes", corpus).unwrap().unwrap();
        assert_eq!(fact.values, vec!["81.29% on the 4-class split".to_string()]);
    }

    #[test]
    fn test_graduation_date() {
        let fact = facts("When does he graduate?").unwrap();
        assert_eq!(fact.kind, FactKind::Graduation);
        assert_eq!(
            fact.values,
            vec!["Computer Science, Expected May 2026".to_string()]
        );
    }

    #[test]
    fn test_graduation_falls_back_to_fixed_degree_string() {
        let fact = extract_facts("when is graduation", "Finishing in May 2026.")
            .unwrap()
            .unwrap();
        assert_eq!(fact.values, vec![GRADUATION_FALLBACK.to_string()]);
    }

    #[test]
    fn test_work_in_2020() {
        let fact = facts("Where did he work in 2020?").unwrap();
        assert_eq!(fact.kind, FactKind::WorkTimeframe);
        assert!(fact.values[0].starts_with("U.S. Census Bureau"), "{:?}", fact.values);
        assert!(!fact.values[0].ends_with(' '));
    }

    #[test]
    fn test_resume_pointer() {
        let fact = facts("Where can I view the resume?").unwrap();
        assert_eq!(fact.kind, FactKind::ResumePointer);
        assert!(fact.values[0].contains("resume.html"));
    }

    #[test]
    fn test_rule_without_extraction_falls_through() {
        // email rule fires but the corpus has no address; nothing else matches
        let found = extract_facts("what is the email", "No address here.").unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_unrelated_question_has_no_fact() {
        assert!(facts("Tell me about the calendar project").is_none());
    }
}
