//! Real HTTP transport using reqwest
//!
//! Blocking client; streaming bodies are read line by line by the caller.

use crate::llm::adapters::transport_types::{AdapterError, LineReader, SyncTransport};
use reqwest::blocking::{Client, Response};
use reqwest::header::RETRY_AFTER;
use std::io::BufReader;
use std::time::Duration;

/// Maximum number of error-body characters kept in an error message
const ERROR_BODY_LIMIT: usize = 300;

/// Upper bound on establishing the TCP/TLS connection
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Real HTTP transport using reqwest
///
/// The client carries no whole-request timeout: a streamed reply may run as
/// long as the service keeps sending. Non-streamed calls get `timeout` per
/// request.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    /// Whole-request timeout in seconds for non-streamed calls
    timeout: u64,
}

impl HttpTransport {
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, AdapterError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout_secs)))
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self {
            client,
            timeout: timeout_secs,
        })
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout
    }

    fn send(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
        timeout: Option<Duration>,
    ) -> Result<Response, AdapterError> {
        tracing::debug!(url, timeout = ?timeout, body_len = body.len(), "POST");

        let mut request = self.client.post(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        for (key, value) in headers {
            request = request.header(*key, *value);
        }

        let response = request.body(body.to_string()).send()?;
        tracing::debug!(status = response.status().as_u16(), "response");
        check_status(response)
    }
}

/// Map non-2xx statuses onto typed errors
fn check_status(response: Response) -> Result<Response, AdapterError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .map(|v| format!("（{}秒后重试）", v))
        .unwrap_or_default();
    let message: String = response
        .text()
        .unwrap_or_default()
        .chars()
        .take(ERROR_BODY_LIMIT)
        .collect();

    tracing::warn!(status = status.as_u16(), "completion service returned an error status");

    match status.as_u16() {
        401 | 403 => Err(AdapterError::Authentication(message)),
        429 => Err(AdapterError::RateLimited { retry_after }),
        code => Err(AdapterError::Http {
            status: code,
            message,
        }),
    }
}

impl SyncTransport for HttpTransport {
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, AdapterError> {
        let timeout = Duration::from_secs(self.timeout);
        let response = self.send(url, headers, body, Some(timeout))?;
        Ok(response.text()?)
    }

    fn post_stream(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<LineReader, AdapterError> {
        // Ends on [DONE], end of body or when the caller drops the reader
        let response = self.send(url, headers, body, None)?;
        Ok(Box::new(BufReader::new(response)))
    }
}
