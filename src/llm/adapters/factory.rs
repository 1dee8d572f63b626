//! Adapter Factory
//!
//! Creates the completion adapter from engine configuration.

use crate::config::EngineConfig;
use crate::llm::adapters::openai::OpenAiAdapter;
use crate::llm::adapters::transport::{HttpTransport, Transport};
use crate::llm::adapters::AdapterError;

/// Real HTTP transport honouring the configured timeout
pub fn http_transport(config: &EngineConfig) -> Result<Transport, AdapterError> {
    Ok(Transport::Real(HttpTransport::with_timeout(
        config.timeout_secs,
    )?))
}

/// Create adapter from config, a resolved key and a transport
pub fn create_adapter(config: &EngineConfig, api_key: String, transport: Transport) -> OpenAiAdapter {
    tracing::debug!(
        base_url = %config.base_url,
        model = %config.model,
        "creating completion adapter"
    );
    OpenAiAdapter::with_transport(
        config.base_url.clone(),
        config.model.clone(),
        api_key,
        transport,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::adapters::transport::FakeTransport;
    use std::sync::Arc;

    #[test]
    fn test_adapter_takes_endpoint_from_config() {
        let config = EngineConfig {
            base_url: "http://localhost:8080/v1".to_string(),
            model: "qwen-plus".to_string(),
            ..EngineConfig::default()
        };
        let adapter = create_adapter(
            &config,
            "sk-test".to_string(),
            Transport::fake(Arc::new(FakeTransport::new(""))),
        );

        assert_eq!(adapter.base_url(), "http://localhost:8080/v1");
        assert_eq!(adapter.model(), "qwen-plus");
    }

    #[test]
    fn test_http_transport_uses_config_timeout() {
        let config = EngineConfig {
            timeout_secs: 45,
            ..EngineConfig::default()
        };
        match http_transport(&config).unwrap() {
            Transport::Real(http) => assert_eq!(http.timeout_secs(), 45),
            Transport::Fake(_) => panic!("expected real transport"),
        }
    }
}
