//! Transport seam types
//!
//! The error type, the streamed body handle and the trait both the HTTP and
//! the fake transport implement.

use std::io::BufRead;

/// Failures talking to the completion service
///
/// Cloneable so one error can travel through the chat event channel and
/// still be kept by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    /// Connection refused, DNS failure, request timeout
    #[error("无法连接模型服务: {0}")]
    Network(String),

    /// Non-2xx status not covered below
    #[error("模型服务返回 HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// 401/403: key rejected
    #[error("API 密钥无效或无权限: {0}")]
    Authentication(String),

    /// 429
    #[error("请求过于频繁，请稍后再试{retry_after}")]
    RateLimited { retry_after: String },

    /// Completion body without the expected fields
    #[error("模型返回内容无法解析: {0}")]
    InvalidResponse(String),

    /// `error` object in a response or stream chunk
    #[error("模型服务错误 {code}: {message}")]
    Provider { code: String, message: String },

    /// Malformed chunk or body cut off mid-stream
    #[error("流式响应中断: {0}")]
    Streaming(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<std::io::Error> for AdapterError {
    fn from(err: std::io::Error) -> Self {
        AdapterError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Json(err.to_string())
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return AdapterError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        if err.is_body() || err.is_decode() {
            return AdapterError::Streaming(err.to_string());
        }
        AdapterError::Network(err.to_string())
    }
}

/// Line-oriented response body handed out by [`SyncTransport::post_stream`]
///
/// Dropping it closes the underlying connection.
pub type LineReader = Box<dyn BufRead + Send>;

/// Synchronous HTTP transport
///
/// Abstraction over the HTTP client to enable testing with FakeTransport.
pub trait SyncTransport: Send + Sync {
    /// POST JSON request and return response body
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, AdapterError>;

    /// POST JSON request and hand back the response body as a line reader
    ///
    /// Status is checked before returning; the body is read lazily by the
    /// caller, one line per blocking read.
    fn post_stream(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<LineReader, AdapterError>;
}
