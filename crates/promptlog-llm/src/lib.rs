//! promptlog-llm: completion client and the call-and-log service.
//!
//! `OpenAiChatClient` performs one provider call and captures the exchange;
//! `CompletionService` pairs it with an `AuditStore` so that every returned
//! response has a durable audit record.

pub mod backend;
pub mod audit;
pub mod service;

pub use backend::{ChatRequest, Exchange, Message, OpenAiChatClient};
pub use service::{Completion, CompletionService};
