//! OpenAI Adapter
//!
//! OpenAI-compatible `/chat/completions` adapter: request bodies, auth
//! headers, dispatch through the transport.

use crate::llm::adapters::transport::{LineReader, SyncTransport, Transport};
use crate::llm::adapters::{AdapterError, LlmMessage};
use serde::Serialize;

pub use crate::llm::adapters::openai_parse::{
    parse_chat_completion, parse_sse_line, SseEvent,
};

/// Sampling parameters for one call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Wire format of a chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [LlmMessage],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

/// OpenAI-compatible adapter
#[derive(Debug)]
pub struct OpenAiAdapter {
    /// Base URL (e.g., https://api.openai.com/v1)
    base_url: String,
    /// Model name (e.g., gpt-4o-mini)
    model: String,
    /// API key
    api_key: String,
    /// HTTP transport
    transport: Transport,
}

impl OpenAiAdapter {
    /// Create adapter with an explicit transport
    pub fn with_transport(
        base_url: String,
        model: String,
        api_key: String,
        transport: Transport,
    ) -> Self {
        Self {
            base_url,
            model,
            api_key,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Serialise a request body
    ///
    /// Messages are forwarded in the given order, one entry per message.
    pub fn build_request(
        &self,
        messages: &[LlmMessage],
        params: CompletionParams,
        stream: bool,
    ) -> Result<String, AdapterError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            stream,
        };
        Ok(serde_json::to_string(&request)?)
    }

    /// Non-streamed completion; returns the full reply text
    pub fn complete(
        &self,
        messages: &[LlmMessage],
        params: CompletionParams,
    ) -> Result<String, AdapterError> {
        let body = self.build_request(messages, params, false)?;
        let auth_header = format!("Bearer {}", self.api_key);
        let headers = [
            ("Authorization", auth_header.as_str()),
            ("Content-Type", "application/json"),
        ];

        let response = self.transport.post_json(&self.endpoint(), &headers, &body)?;
        parse_chat_completion(&response)
    }

    /// Streamed completion; returns the raw SSE body as a line reader
    pub fn open_stream(
        &self,
        messages: &[LlmMessage],
        params: CompletionParams,
    ) -> Result<LineReader, AdapterError> {
        let body = self.build_request(messages, params, true)?;
        let auth_header = format!("Bearer {}", self.api_key);
        let headers = [
            ("Authorization", auth_header.as_str()),
            ("Content-Type", "application/json"),
            ("Accept", "text/event-stream"),
        ];

        self.transport.post_stream(&self.endpoint(), &headers, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::adapters::transport::FakeTransport;
    use std::sync::Arc;

    fn adapter(fake: Arc<FakeTransport>) -> OpenAiAdapter {
        OpenAiAdapter::with_transport(
            "https://api.example.com/v1/".to_string(),
            "gpt-4o-mini".to_string(),
            "sk-test".to_string(),
            Transport::fake(fake),
        )
    }

    #[test]
    fn test_request_body_shape() {
        let adapter = adapter(Arc::new(FakeTransport::new("")));
        let messages = vec![LlmMessage::system("sys"), LlmMessage::user("hi")];
        let body = adapter
            .build_request(
                &messages,
                CompletionParams {
                    temperature: 0.7,
                    max_tokens: 2000,
                },
                true,
            )
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["stream"], true);
        assert_eq!(json["max_tokens"], 2000);
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_complete_hits_chat_completions_endpoint() {
        let fake = Arc::new(FakeTransport::new(
            r#"{"choices":[{"message":{"content":"ok"}}]}"#,
        ));
        let adapter = adapter(fake.clone());
        let reply = adapter
            .complete(
                &[LlmMessage::user("hi")],
                CompletionParams {
                    temperature: 0.7,
                    max_tokens: 10,
                },
            )
            .unwrap();

        assert_eq!(reply, "ok");
        assert_eq!(
            fake.requests()[0].url,
            "https://api.example.com/v1/chat/completions"
        );
        assert_eq!(fake.last_request_json().unwrap()["stream"], false);
    }
}
