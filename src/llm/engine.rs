//! Conversation engine
//!
//! Two lanes over one completion adapter:
//! - analysis: system prompt + one templated user message
//! - chat: chat system prompt + the windowed transcript
//!
//! The credential is resolved at construction. A missing key fails before
//! any transport exists, so no request can be issued without one.

use crate::config::{ConfigError, EngineConfig};
use crate::llm::adapters::{
    create_adapter, http_transport, AdapterError, CompletionParams, LlmMessage, OpenAiAdapter,
    Transport,
};
use crate::llm::contracts::{analysis_messages, chat_system_prompt};
use crate::llm::credentials::{CredentialResolver, CredentialSource};
use crate::llm::history::HistoryWindow;
use crate::llm::stream::FragmentStream;
use crate::llm::types::{AnalysisRequest, PromptPreset, Turn, UserProfile};
use std::path::Path;

/// Engine errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Missing credential or invalid configuration; fatal at construction
    #[error("{0}")]
    Configuration(#[from] ConfigError),

    /// Network, HTTP status, malformed stream or I/O failure
    #[error("{0}")]
    Transport(#[from] AdapterError),
}

impl EngineError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, EngineError::Configuration(_))
    }
}

const ANALYSIS_LANE: &str = "analysis";
const CHAT_LANE: &str = "chat";

#[derive(Debug)]
pub struct ConversationEngine {
    adapter: OpenAiAdapter,
    config: EngineConfig,
    window: HistoryWindow,
    credential_source: CredentialSource,
}

impl ConversationEngine {
    /// Engine over the real HTTP transport
    pub fn new(config: EngineConfig, resolver: &CredentialResolver) -> Result<Self, EngineError> {
        config.validate()?;
        let credential = resolver.resolve()?;
        let transport = http_transport(&config)?;
        Ok(Self::assemble(
            config,
            credential.source(),
            credential.into_value(),
            transport,
        ))
    }

    /// Engine over an explicit transport
    ///
    /// Config and credential are checked first; on failure the transport is
    /// dropped unused.
    pub fn with_transport(
        config: EngineConfig,
        resolver: &CredentialResolver,
        transport: Transport,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let credential = resolver.resolve()?;
        Ok(Self::assemble(
            config,
            credential.source(),
            credential.into_value(),
            transport,
        ))
    }

    /// Load `config.toml` and `secrets.toml` from `config_dir`
    pub fn from_config_dir(config_dir: &Path) -> Result<Self, EngineError> {
        let config = EngineConfig::load(config_dir)?;
        let resolver = CredentialResolver::for_config_dir(config_dir, config.api_key_env.clone());
        Self::new(config, &resolver)
    }

    fn assemble(
        config: EngineConfig,
        credential_source: CredentialSource,
        api_key: String,
        transport: Transport,
    ) -> Self {
        let adapter = create_adapter(&config, api_key, transport);
        let window = HistoryWindow::new(config.history_window);
        tracing::info!(
            model = %config.model,
            preset = config.preset.as_str(),
            window = window.max_turns(),
            credential = ?credential_source,
            "conversation engine ready"
        );
        Self {
            adapter,
            config,
            window,
            credential_source,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn model(&self) -> &str {
        self.adapter.model()
    }

    pub fn preset(&self) -> PromptPreset {
        self.config.preset
    }

    /// Override the prompt preset (e.g. from a command-line flag)
    pub fn set_preset(&mut self, preset: PromptPreset) {
        self.config.preset = preset;
    }

    pub fn window(&self) -> HistoryWindow {
        self.window
    }

    pub fn credential_source(&self) -> CredentialSource {
        self.credential_source
    }

    fn analysis_params(&self) -> CompletionParams {
        CompletionParams {
            temperature: self.config.temperature,
            max_tokens: self.config.analysis_max_tokens,
        }
    }

    fn chat_params(&self) -> CompletionParams {
        CompletionParams {
            temperature: self.config.temperature,
            max_tokens: self.config.chat_max_tokens,
        }
    }

    /// Messages for a single-shot analysis: system, then the templated task
    pub fn build_analysis_messages(&self, request: &AnalysisRequest) -> Vec<LlmMessage> {
        analysis_messages(request, self.config.preset)
    }

    /// Messages for a chat turn: chat system prompt, then the windowed transcript
    pub fn build_chat_messages(&self, transcript: &[Turn], profile: &UserProfile) -> Vec<LlmMessage> {
        self.window
            .build_messages(chat_system_prompt(profile, self.config.preset), transcript)
    }

    /// Streamed single-shot analysis
    pub fn run_analysis(&self, request: &AnalysisRequest) -> Result<FragmentStream, EngineError> {
        let messages = self.build_analysis_messages(request);
        tracing::info!(
            lane = ANALYSIS_LANE,
            symptoms_len = request.symptoms.chars().count(),
            duration = request.duration.label(),
            "starting analysis"
        );
        self.open(messages, self.analysis_params(), ANALYSIS_LANE)
    }

    /// Streamed reply to the latest turn of `transcript`
    pub fn run_chat(
        &self,
        transcript: &[Turn],
        profile: &UserProfile,
    ) -> Result<FragmentStream, EngineError> {
        let messages = self.build_chat_messages(transcript, profile);
        tracing::info!(
            lane = CHAT_LANE,
            turns = transcript.len(),
            sent = messages.len() - 1,
            "starting chat reply"
        );
        self.open(messages, self.chat_params(), CHAT_LANE)
    }

    /// Non-streamed single-shot analysis
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<String, EngineError> {
        let messages = self.build_analysis_messages(request);
        tracing::info!(lane = ANALYSIS_LANE, streamed = false, "starting analysis");
        let reply = self.adapter.complete(&messages, self.analysis_params())?;
        tracing::debug!(lane = ANALYSIS_LANE, reply_len = reply.len(), "analysis complete");
        Ok(reply)
    }

    fn open(
        &self,
        messages: Vec<LlmMessage>,
        params: CompletionParams,
        lane: &'static str,
    ) -> Result<FragmentStream, EngineError> {
        tracing::debug!(
            lane,
            messages = messages.len(),
            prompt_chars = messages.iter().map(|m| m.content.chars().count()).sum::<usize>(),
            max_tokens = params.max_tokens,
            "opening stream"
        );
        let reader = self.adapter.open_stream(&messages, params).map_err(|e| {
            tracing::warn!(lane, error = %e, "completion request failed");
            EngineError::Transport(e)
        })?;
        Ok(FragmentStream::new(reader, lane))
    }
}
