//! Axum route handlers for the Q&A API.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::qa::formatter::{format_answer, Answer, RenderedAnswer};
use crate::qa::retriever::RetrievalMethod;
use crate::qa::session::{QaState, QueryOutcome};
use crate::state::AppState;

pub const PROMPT_MESSAGE: &str = "Enter a question to get started.";
pub const NO_MATCH_MESSAGE: &str = "I couldn't find relevant information to answer that question. Try rephrasing or asking about education, experience, projects, or skills.";
pub const ERROR_MESSAGE: &str = "Something went wrong. Please try again.";
const MAX_QUESTION_CHARS: usize = 500;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AskStatus {
    Prompt,
    Answered,
    NoMatch,
    Error,
}

impl From<QueryOutcome> for AskStatus {
    fn from(outcome: QueryOutcome) -> Self {
        match outcome {
            QueryOutcome::Answered => AskStatus::Answered,
            QueryOutcome::NoMatch => AskStatus::NoMatch,
            QueryOutcome::Error => AskStatus::Error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub query_id: Uuid,
    pub status: AskStatus,
    pub method: Option<RetrievalMethod>,
    pub answer: RenderedAnswer,
    pub answered_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub state: QaState,
    pub status: String,
    pub accepts_input: bool,
}

impl From<QaState> for StatusResponse {
    fn from(state: QaState) -> Self {
        Self {
            state,
            status: state.status_line().to_string(),
            accepts_input: state.accepts_input(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/qa/status
pub async fn handle_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(state.qa.state().into())
}

/// POST /api/v1/qa/enable
///
/// One-time switch that unlocks the question box.
pub async fn handle_enable(State(state): State<AppState>) -> Json<StatusResponse> {
    let current = state.qa.enable();
    info!("Q&A enabled");
    Json(current.into())
}

/// POST /api/v1/qa/ask
///
/// Empty questions get the prompt message without touching the retriever.
/// Retrieval failures are answered with a generic message, never an HTTP error.
pub async fn handle_ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    state.qa.ensure_enabled().inspect_err(|e| warn!("Ask rejected: {e}"))?;

    let question = request.question.trim();
    if question.is_empty() {
        return Ok(Json(AskResponse {
            query_id: Uuid::new_v4(),
            status: AskStatus::Prompt,
            method: None,
            answer: format_answer(&Answer::Single(PROMPT_MESSAGE.to_string()), None, None),
            answered_at: Utc::now(),
        }));
    }

    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err(AppError::Validation(format!(
            "question cannot exceed {MAX_QUESTION_CHARS} characters"
        )));
    }

    let guard = state
        .qa
        .begin()
        .inspect_err(|e| warn!("Ask rejected: {e}"))?;
    let query_id = Uuid::new_v4();

    // display-only pause while the status line reads "Searching..."
    tokio::time::sleep(state.config.search_delay()).await;

    let (outcome, method, answer) = match state.retriever.retrieve(question).await {
        Ok(retrieval) => {
            let method = Some(retrieval.method);
            match Answer::from_snippets(retrieval.snippets) {
                Some(answer) => (
                    QueryOutcome::Answered,
                    method,
                    format_answer(&answer, None, Some(question)),
                ),
                None => (
                    QueryOutcome::NoMatch,
                    method,
                    format_answer(&Answer::Single(NO_MATCH_MESSAGE.to_string()), None, None),
                ),
            }
        }
        Err(e) => {
            error!(%query_id, "Retrieval failed: {e}");
            (
                QueryOutcome::Error,
                None,
                format_answer(&Answer::Single(ERROR_MESSAGE.to_string()), Some(vec![]), None),
            )
        }
    };

    guard.finish(outcome);
    info!(%query_id, ?outcome, ?method, "Answered question");

    Ok(Json(AskResponse {
        query_id,
        status: outcome.into(),
        method,
        answer,
        answered_at: Utc::now(),
    }))
}
