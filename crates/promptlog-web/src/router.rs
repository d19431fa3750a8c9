//! Axum router: maps URL paths to handlers.

use std::sync::Arc;

use axum::{routing::any, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::completion::openai_completion;
use crate::state::{AppState, SharedState};

pub const COMPLETION_ROUTE: &str = "/api/openai";

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route(COMPLETION_ROUTE, any(openai_completion))
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
