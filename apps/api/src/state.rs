use std::sync::Arc;

use crate::config::Config;
use crate::qa::corpus::Corpus;
use crate::qa::{KeywordRetriever, QaController, Retriever};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable answer backend. Default: KeywordRetriever over the embedded resume.
    pub retriever: Arc<dyn Retriever>,
    /// Lifecycle of the single question box this service backs.
    pub qa: Arc<QaController>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let retriever =
            KeywordRetriever::new(Corpus::resume(), config.window_size, config.max_passages);
        let qa = QaController::new(config.auto_enable);
        Self {
            config,
            retriever: Arc::new(retriever),
            qa: Arc::new(qa),
        }
    }
}
