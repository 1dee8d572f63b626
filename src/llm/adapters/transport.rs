//! HTTP Transport for LLM Adapters
//!
//! Provides the synchronous HTTP client seam with streaming support.

use std::sync::Arc;

pub use crate::llm::adapters::transport_fake::FakeTransport;
pub use crate::llm::adapters::transport_http::HttpTransport;
pub use crate::llm::adapters::transport_types::{AdapterError, LineReader, SyncTransport};

/// Concrete transport enum
///
/// Wraps all transport types, avoiding dyn compatibility issues. The fake is
/// shared so tests can inspect recorded requests after handing it over.
#[derive(Debug)]
pub enum Transport {
    Real(HttpTransport),
    Fake(Arc<FakeTransport>),
}

impl Transport {
    pub fn fake(fake: Arc<FakeTransport>) -> Self {
        Transport::Fake(fake)
    }
}

impl SyncTransport for Transport {
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, AdapterError> {
        match self {
            Transport::Real(t) => t.post_json(url, headers, body),
            Transport::Fake(t) => t.post_json(url, headers, body),
        }
    }

    fn post_stream(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<LineReader, AdapterError> {
        match self {
            Transport::Real(t) => t.post_stream(url, headers, body),
            Transport::Fake(t) => t.post_stream(url, headers, body),
        }
    }
}
