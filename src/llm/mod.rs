//! LLM integration: prompt assembly, conversation engine, adapter layer
//!
//! Two lanes share one adapter:
//! - run_analysis() → FragmentStream (single-shot, templated form input)
//! - run_chat()     → FragmentStream (multi-turn, windowed transcript)
//!
//! Prompt construction is pure (contracts); only the adapter touches the
//! network.

pub mod adapters;
pub mod chat_events;
pub mod chat_thread;
pub mod contracts;
pub mod credentials;
pub mod engine;
pub mod history;
pub mod stream;
pub mod types;

// Re-export main types
pub use types::{
    Age, AnalysisRequest, Gender, ProfileError, PromptPreset, Speaker, SymptomDuration,
    Transcript, Turn, UserProfile, PENDING_REPLY_SENTINEL,
};

// Re-export contract functions
pub use contracts::{
    analysis_messages, analysis_prompt, chat_system_prompt, greeting, system_prompt,
    GREETING_MARKER, SECTION_CONTRACT_VERSION, SECTION_HEADERS,
};

pub use adapters::{AdapterError, LlmMessage, LlmRole};
pub use chat_events::{ChatEvent, ChatReceiver, ChatSender};
pub use chat_thread::{generate_session_id, spawn_chat_thread, ChatThreadHandle};
pub use credentials::{Credential, CredentialResolver, CredentialSource};
pub use engine::{ConversationEngine, EngineError};
pub use history::HistoryWindow;
pub use stream::FragmentStream;
