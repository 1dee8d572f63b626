//! Fake transport for testing
//!
//! Uses fixture strings instead of real HTTP calls and records every request
//! it receives.

use crate::llm::adapters::transport_types::{AdapterError, LineReader, SyncTransport};
use std::io::{self, BufReader, Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One request seen by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub body: String,
}

/// Fake transport for testing (uses fixture strings)
#[derive(Debug, Default)]
pub struct FakeTransport {
    /// Response body to return
    pub response_body: String,
    /// Stream body to return line-by-line
    pub stream_body: String,
    /// Error to return instead of a response (if set)
    pub error: Option<AdapterError>,
    /// When set, the stream body is cut off with an I/O error after it is exhausted
    pub interrupt_stream: bool,
    calls: AtomicUsize,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    /// Create fake transport with given response
    pub fn new(response: &str) -> Self {
        Self {
            response_body: response.to_string(),
            ..Self::default()
        }
    }

    /// Create fake transport with streaming response
    pub fn with_stream(response: &str, stream: &str) -> Self {
        Self {
            response_body: response.to_string(),
            stream_body: stream.to_string(),
            ..Self::default()
        }
    }

    /// Stream that delivers `stream` and then fails mid-read
    pub fn with_interrupted_stream(stream: &str) -> Self {
        Self {
            stream_body: stream.to_string(),
            interrupt_stream: true,
            ..Self::default()
        }
    }

    /// Create fake transport that returns a network error
    pub fn with_error(msg: &str) -> Self {
        Self::with_adapter_error(AdapterError::Network(msg.to_string()))
    }

    pub fn with_adapter_error(error: AdapterError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Number of requests issued so far (successful or not)
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Body of the most recent request parsed as JSON
    pub fn last_request_json(&self) -> Option<serde_json::Value> {
        self.requests()
            .last()
            .and_then(|r| serde_json::from_str(&r.body).ok())
    }

    fn record(&self, url: &str, body: &str) -> Result<(), AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(RecordedRequest {
                url: url.to_string(),
                body: body.to_string(),
            });
        }
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl SyncTransport for FakeTransport {
    fn post_json(
        &self,
        url: &str,
        _headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, AdapterError> {
        self.record(url, body)?;
        Ok(self.response_body.clone())
    }

    fn post_stream(
        &self,
        url: &str,
        _headers: &[(&str, &str)],
        body: &str,
    ) -> Result<LineReader, AdapterError> {
        self.record(url, body)?;
        let stream = if self.stream_body.is_empty() {
            &self.response_body
        } else {
            &self.stream_body
        };
        let bytes = stream.clone().into_bytes();
        if self.interrupt_stream {
            Ok(Box::new(BufReader::new(InterruptedBody {
                inner: Cursor::new(bytes),
            })))
        } else {
            Ok(Box::new(Cursor::new(bytes)))
        }
    }
}

/// Body that fails with a connection reset once its bytes run out
struct InterruptedBody {
    inner: Cursor<Vec<u8>>,
}

impl Read for InterruptedBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf)? {
            0 => Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )),
            n => Ok(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufRead;

    #[test]
    fn test_fake_transport_basic() {
        let transport = FakeTransport::new("test response");
        let result = transport.post_json("http://test", &[], "{}");
        assert_eq!(result.unwrap(), "test response");
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_fake_transport_with_error() {
        let transport = FakeTransport::with_error("test error");
        let result = transport.post_json("http://test", &[], "{}");
        assert!(matches!(result, Err(AdapterError::Network(_))));
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_fake_transport_stream() {
        let transport = FakeTransport::with_stream("response", "line1\nline2\nline3");
        let reader = transport.post_stream("http://test", &[], "{}").unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["line1", "line2", "line3"]);
    }

    #[test]
    fn test_interrupted_stream_errors_after_body() {
        let transport = FakeTransport::with_interrupted_stream("line1\n");
        let mut reader = transport.post_stream("http://test", &[], "{}").unwrap();
        let mut line = String::new();
        assert!(reader.read_line(&mut line).is_ok());
        assert_eq!(line, "line1\n");
        line.clear();
        assert!(reader.read_line(&mut line).is_err());
    }

    #[test]
    fn test_requests_are_recorded() {
        let transport = FakeTransport::new("ok");
        transport
            .post_json("http://test/chat/completions", &[], r#"{"a":1}"#)
            .unwrap();
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://test/chat/completions");
        assert_eq!(transport.last_request_json().unwrap()["a"], 1);
    }

    #[test]
    fn test_adapter_error_display() {
        let err = AdapterError::Network("test".to_string());
        assert_eq!(format!("{}", err), "无法连接模型服务: test");

        let err = AdapterError::Http {
            status: 404,
            message: "not found".to_string(),
        };
        assert_eq!(format!("{}", err), "模型服务返回 HTTP 404: not found");

        let err = AdapterError::RateLimited {
            retry_after: "（60秒后重试）".to_string(),
        };
        assert!(format!("{}", err).starts_with("请求过于频繁"));
        assert!(format!("{}", err).contains("60秒"));
    }
}
