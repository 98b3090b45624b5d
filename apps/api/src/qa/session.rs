//! Query lifecycle controller.
//!
//! `idle → ready → searching → answered | no_match | error`, and every terminal state
//! accepts the next question. `idle` is left once, by an explicit enable. Only one query
//! may be in flight; a second ask while `searching` is rejected.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::qa::QaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QaState {
    Idle,
    Ready,
    Searching,
    Answered,
    NoMatch,
    Error,
}

impl QaState {
    pub fn accepts_input(self) -> bool {
        !matches!(self, QaState::Idle | QaState::Searching)
    }

    /// Text for the status line next to the question box.
    pub fn status_line(self) -> &'static str {
        match self {
            QaState::Idle => "Q&A is off. Enable it to ask a question.",
            QaState::Searching => "Searching...",
            _ => "Ready. Ask a question.",
        }
    }
}

/// How a query that reached the retriever ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOutcome {
    Answered,
    NoMatch,
    Error,
}

impl From<QueryOutcome> for QaState {
    fn from(outcome: QueryOutcome) -> Self {
        match outcome {
            QueryOutcome::Answered => QaState::Answered,
            QueryOutcome::NoMatch => QaState::NoMatch,
            QueryOutcome::Error => QaState::Error,
        }
    }
}

/// Owns the lifecycle state. Shared through `AppState` as `Arc<QaController>`.
#[derive(Debug)]
pub struct QaController {
    state: Mutex<QaState>,
}

impl QaController {
    pub fn new(enabled: bool) -> Self {
        let initial = if enabled { QaState::Ready } else { QaState::Idle };
        Self {
            state: Mutex::new(initial),
        }
    }

    pub fn state(&self) -> QaState {
        *self.state.lock()
    }

    /// Leaves `idle`. Any later call is a no-op.
    pub fn enable(&self) -> QaState {
        let mut state = self.state.lock();
        if *state == QaState::Idle {
            *state = QaState::Ready;
        }
        *state
    }

    pub fn ensure_enabled(&self) -> Result<(), QaError> {
        match self.state() {
            QaState::Idle => Err(QaError::Disabled),
            _ => Ok(()),
        }
    }

    /// Moves to `searching`. The returned guard must be finished with the outcome;
    /// dropping it unfinished puts the controller back to `ready`.
    pub fn begin(self: &Arc<Self>) -> Result<SearchGuard, QaError> {
        let mut state = self.state.lock();
        match *state {
            QaState::Idle => Err(QaError::Disabled),
            QaState::Searching => Err(QaError::Busy),
            _ => {
                *state = QaState::Searching;
                Ok(SearchGuard {
                    controller: Arc::clone(self),
                    finished: false,
                })
            }
        }
    }

    fn settle(&self, next: QaState) {
        *self.state.lock() = next;
    }
}

/// Marks one in-flight query.
#[derive(Debug)]
pub struct SearchGuard {
    controller: Arc<QaController>,
    finished: bool,
}

impl SearchGuard {
    pub fn finish(mut self, outcome: QueryOutcome) {
        self.finished = true;
        self.controller.settle(outcome.into());
    }
}

impl Drop for SearchGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.controller.settle(QaState::Ready);
        }
    }
}
