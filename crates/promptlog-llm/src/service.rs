//! The call-and-log sequence shared by every entry point.

use std::sync::Arc;

use promptlog_common::{AuditStore, CallerContext, Result};

use crate::backend::OpenAiChatClient;

/// Result of a logged completion.
#[derive(Debug, Clone)]
pub struct Completion {
    pub request_id: String,
    pub audit_id: i64,
    /// Provider HTTP status.
    pub status: u16,
    /// Raw provider response body.
    pub body: Vec<u8>,
}

/// Calls the provider, then appends the audit record. A response is only
/// returned once its record has been written.
pub struct CompletionService {
    client: OpenAiChatClient,
    store: Arc<dyn AuditStore>,
}

impl CompletionService {
    pub fn new(client: OpenAiChatClient, store: Arc<dyn AuditStore>) -> Self {
        Self { client, store }
    }

    pub async fn call_and_log(
        &self,
        keyword: &str,
        request_id: Option<&str>,
        caller: Option<&CallerContext>,
    ) -> Result<Completion> {
        let exchange = match self.client.complete(keyword, request_id, caller).await {
            Ok(exchange) => exchange,
            Err(e) => {
                tracing::warn!(error = %e, "Provider call failed; nothing logged");
                return Err(e);
            }
        };

        let audit_id = match self.store.append(&exchange.to_audit_record()).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(
                    request_id = %exchange.request_id,
                    backend = self.store.backend(),
                    error = %e,
                    "Audit write failed; discarding provider response"
                );
                return Err(e);
            }
        };

        tracing::info!(
            audit_id,
            request_id = %exchange.request_id,
            status = exchange.status,
            "Exchange logged"
        );

        Ok(Completion {
            request_id: exchange.request_id,
            audit_id,
            status: exchange.status,
            body: exchange.response_body,
        })
    }
}
