pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::qa::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/qa/status", get(handlers::handle_status))
        .route("/api/v1/qa/enable", post(handlers::handle_enable))
        .route("/api/v1/qa/ask", post(handlers::handle_ask))
        .with_state(state)
}
