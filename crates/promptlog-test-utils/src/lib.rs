//! Test doubles and fixtures shared by the promptlog crates.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use promptlog_common::{AuditRecord, AuditStore, PromptlogError, Result};
use promptlog_config::ProviderConfig;
use secrecy::SecretString;

pub const TEST_API_KEY: &str = "sk-test";
pub const TEST_ORG_KEY: &str = "org-test";
pub const TEST_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const TEST_MODEL: &str = "gpt-3.5-turbo";
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Provider settings pointing at a mock server rooted at `base_url`.
pub fn provider_config(base_url: &str) -> ProviderConfig {
    ProviderConfig {
        url: format!("{}{}", base_url.trim_end_matches('/'), COMPLETIONS_PATH),
        model: TEST_MODEL.to_string(),
        api_key: SecretString::from(TEST_API_KEY.to_string()),
        org_key: SecretString::from(TEST_ORG_KEY.to_string()),
        system: TEST_SYSTEM_PROMPT.to_string(),
        temperature: 0.5,
        max_tokens: 64,
        timeout_secs: 5,
        user_agent: "promptlog/test".to_string(),
    }
}

/// A minimal chat-completion response body.
pub fn chat_completion_json(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": TEST_MODEL,
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15 }
    })
}

// ── Stores ────────────────────────────────────────────────────────────────────

/// Keeps appended records in memory, assigning ids from 1.
#[derive(Default)]
pub struct MemoryAuditStore {
    records: Mutex<Vec<AuditRecord>>,
    next_id: AtomicI64,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn append(&self, record: &AuditRecord) -> Result<i64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record.clone());
        Ok(id)
    }

    fn backend(&self) -> &str {
        "memory"
    }
}

/// Rejects every write with a storage error.
pub struct FailingAuditStore {
    message: String,
}

impl FailingAuditStore {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl Default for FailingAuditStore {
    fn default() -> Self {
        Self::new("relation \"logs\" does not exist")
    }
}

#[async_trait]
impl AuditStore for FailingAuditStore {
    async fn append(&self, _record: &AuditRecord) -> Result<i64> {
        Err(PromptlogError::Storage(sqlx::Error::Protocol(self.message.clone())))
    }

    fn backend(&self) -> &str {
        "failing"
    }
}
