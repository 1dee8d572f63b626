//! LLM Adapters
//!
//! Provider-facing layer for OpenAI-compatible chat completion APIs:
//! request bodies, the HTTP transport seam, SSE parsing.

pub mod factory;

use crate::llm::types::{Speaker, Turn};
use serde::Serialize;

/// LLM message role (universal subset across providers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmRole {
    /// System message (sets behavior/context)
    System,
    /// User message (human input)
    User,
    /// Assistant message (LLM response)
    Assistant,
}

impl From<Speaker> for LlmRole {
    fn from(speaker: Speaker) -> Self {
        match speaker {
            Speaker::System => LlmRole::System,
            Speaker::User => LlmRole::User,
            Speaker::Assistant => LlmRole::Assistant,
        }
    }
}

/// Single request message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LlmMessage {
    pub role: LlmRole,
    pub content: String,
}

impl LlmMessage {
    pub fn new(role: LlmRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(LlmRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(LlmRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(LlmRole::Assistant, content)
    }
}

impl From<&Turn> for LlmMessage {
    fn from(turn: &Turn) -> Self {
        Self::new(turn.role().into(), turn.content())
    }
}

pub mod openai;
pub mod openai_parse;
pub mod transport;
pub mod transport_fake;
pub mod transport_http;
pub mod transport_types;

// Re-export common types
pub use factory::{create_adapter, http_transport};
pub use openai::{CompletionParams, OpenAiAdapter};
pub use transport::{AdapterError, SyncTransport, Transport};
