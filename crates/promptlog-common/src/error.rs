use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptlogError {
    /// Building, sending, or reading the provider exchange failed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The audit write was rejected.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl PromptlogError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

pub type Result<T> = std::result::Result<T, PromptlogError>;

/// Handler-facing error. Every failure is surfaced as an opaque
/// `500 Internal Server Error` carrying the error text.
#[derive(Debug)]
pub struct ApiError(pub PromptlogError);

impl From<PromptlogError> for ApiError {
    fn from(err: PromptlogError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}
