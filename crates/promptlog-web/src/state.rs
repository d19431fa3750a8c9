//! Shared application state for the web server.

use std::sync::Arc;

use promptlog_llm::CompletionService;

/// Shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CompletionService>,
}

impl AppState {
    pub fn new(service: CompletionService) -> Self {
        Self { service: Arc::new(service) }
    }
}

pub type SharedState = Arc<AppState>;
