//! tcm-helper: conversation and prompt-assembly engine for a TCM wellness
//! chat assistant
//!
//! The library turns user turns plus optional metadata into requests for an
//! OpenAI-compatible completion endpoint and streams the reply back as a
//! lazy sequence of text fragments. The `ui` module holds the terminal
//! surface's state; the binary only does I/O.

pub mod cli;
pub mod config;
pub mod llm;
pub mod logging;
pub mod ui;

// Re-export the engine surface
pub use config::{ConfigError, EngineConfig};
pub use llm::{
    AnalysisRequest, ConversationEngine, CredentialResolver, EngineError, FragmentStream, Turn,
    UserProfile,
};
