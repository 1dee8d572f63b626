//! OpenAI response parsing
//!
//! Public functions for parsing OpenAI JSON and SSE responses.

use crate::llm::adapters::transport_types::AdapterError;
use serde_json::Value as JsonValue;

/// Outcome of parsing one SSE line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Non-empty content delta
    Delta(String),
    /// `data: [DONE]` end-of-stream marker
    Done,
    /// Anything carrying no content: blank lines, comments, role-only or null deltas
    Skip,
}

/// Parse OpenAI chat completion JSON response
pub fn parse_chat_completion(response: &str) -> Result<String, AdapterError> {
    let json: JsonValue = serde_json::from_str(response)?;

    if let Some(err) = provider_error(&json) {
        return Err(err);
    }

    let content = json["choices"]
        .get(0)
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| {
            AdapterError::InvalidResponse("Missing choices[0].message.content".to_string())
        })?;

    Ok(content.to_string())
}

/// Parse a single line of an SSE body
///
/// A `data:` payload that is not valid JSON is a protocol error; so is an
/// `error` object sent inside the stream.
pub fn parse_sse_line(line: &str) -> Result<SseEvent, AdapterError> {
    let line = line.trim();
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(SseEvent::Skip);
    };
    let data = data.trim_start();
    if data.is_empty() {
        return Ok(SseEvent::Skip);
    }
    if data == "[DONE]" {
        return Ok(SseEvent::Done);
    }

    let json: JsonValue = serde_json::from_str(data)
        .map_err(|e| AdapterError::Streaming(format!("malformed chunk: {}", e)))?;

    if let Some(err) = provider_error(&json) {
        return Err(err);
    }

    let delta = json["choices"]
        .get(0)
        .and_then(|c| c.get("delta"))
        .and_then(|d| d.get("content"))
        .and_then(|c| c.as_str());

    match delta {
        Some(text) if !text.is_empty() => Ok(SseEvent::Delta(text.to_string())),
        _ => Ok(SseEvent::Skip),
    }
}

fn provider_error(json: &JsonValue) -> Option<AdapterError> {
    let err = json.get("error")?;
    let message = err
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("unknown error")
        .to_string();
    let code = err
        .get("code")
        .and_then(|c| c.as_str())
        .or_else(|| err.get("type").and_then(|t| t.as_str()))
        .unwrap_or("unknown")
        .to_string();
    Some(AdapterError::Provider { code, message })
}
