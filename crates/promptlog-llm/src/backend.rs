//! Chat-completion client for an OpenAI-style endpoint.
//!
//! One call builds a two-message request (the configured system prompt plus
//! the caller's keyword), sends it exactly once, and captures everything the
//! audit log needs about the exchange. There is no retry.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use promptlog_common::{dump_headers, CallerContext, Result};
use promptlog_config::ProviderConfig;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Organization header sent alongside the bearer token.
pub const OPENAI_ORGANIZATION: &str = "OpenAI-Organization";

// ── Request ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,   // "system" | "user"
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

// ── Exchange ──────────────────────────────────────────────────────────────────

/// Snapshot of one completed provider call. Only produced when a response
/// was received and its body fully read.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub request_id: String,
    pub method: String,
    pub url: String,
    pub request_body: String,
    pub request_headers: String,
    pub response_headers: String,
    pub response_body: Vec<u8>,
    pub status: u16,
    pub user_agent: String,
    pub ip_address: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub request_size: i64,
    pub response_size: i64,
}

// ── Client ────────────────────────────────────────────────────────────────────

pub struct OpenAiChatClient {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAiChatClient {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder.build()?;
        Ok(Self { config, client })
    }

    pub fn model_id(&self) -> &str { &self.config.model }
    pub fn endpoint(&self) -> &str { &self.config.url }

    /// The request body for `keyword`: the system prompt, then the keyword
    /// as the user message.
    pub fn chat_request(&self, keyword: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![Message::system(&self.config.system), Message::user(keyword)],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    /// Send one completion request.
    ///
    /// An empty or missing `request_id` is replaced with a fresh UUIDv4.
    /// With no `caller`, client IP and user-agent are resolved against the
    /// outbound request itself. Any provider status counts as a completed
    /// exchange; only build, send, and body-read failures are errors.
    pub async fn complete(
        &self,
        keyword: &str,
        request_id: Option<&str>,
        caller: Option<&CallerContext>,
    ) -> Result<Exchange> {
        let request_id = request_id
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let body = serde_json::to_string(&self.chat_request(keyword))?;

        let mut builder = self.client
            .post(&self.config.url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, &self.config.user_agent)
            .bearer_auth(self.config.api_key.expose_secret());
        let org_key = self.config.org_key.expose_secret();
        if !org_key.is_empty() {
            builder = builder.header(OPENAI_ORGANIZATION, org_key);
        }
        let request = builder.body(body.clone()).build()?;

        let caller = match caller {
            Some(c) => c.clone(),
            None => CallerContext::from_headers(request.headers(), None),
        };
        let user_agent = caller.user_agent.unwrap_or_else(|| self.config.user_agent.clone());
        let method = request.method().to_string();
        let url = request.url().to_string();
        let request_headers = dump_headers(request.headers());
        let request_size = i64::try_from(body.len()).unwrap_or(-1);

        tracing::debug!(%request_id, %url, model = %self.config.model, "Sending completion request");

        let started_at = Utc::now();
        let clock = Instant::now();
        let response = self.client.execute(request).await?;
        let status = response.status().as_u16();
        let response_headers = dump_headers(response.headers());
        let response_body = response.bytes().await?.to_vec();
        let elapsed = clock.elapsed();
        let finished_at = started_at
            + chrono::Duration::from_std(elapsed).unwrap_or_else(|_| chrono::Duration::zero());

        tracing::info!(
            %request_id,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Provider responded"
        );

        Ok(Exchange {
            request_id,
            method,
            url,
            request_body: body,
            request_headers,
            response_headers,
            response_size: i64::try_from(response_body.len()).unwrap_or(-1),
            response_body,
            status,
            user_agent,
            ip_address: caller.ip_address,
            started_at,
            finished_at,
            elapsed,
            request_size,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
