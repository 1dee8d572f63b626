//! Chat thread events
//!
//! Events sent from the background chat thread to the terminal loop via
//! mpsc::channel. The receiving side owns the session and applies them.

use crate::llm::engine::EngineError;
use std::sync::mpsc;

/// Channel sender for chat events
pub type ChatSender = mpsc::Sender<ChatEvent>;
/// Channel receiver for chat events
pub type ChatReceiver = mpsc::Receiver<ChatEvent>;

/// Event sent from chat thread to main thread
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// Thread spawned, request about to be sent
    Started { session_id: String, turns: usize },
    /// One fragment of the reply
    Chunk { session_id: String, content: String },
    /// Reply finished (concatenation of every chunk)
    Complete {
        session_id: String,
        full_response: String,
    },
    /// Request failed before or during streaming
    Error {
        session_id: String,
        error: EngineError,
    },
    /// Stopped on request; no further events follow
    Cancelled { session_id: String, fragments: usize },
}

impl ChatEvent {
    /// Get session ID for this event
    pub fn session_id(&self) -> &str {
        match self {
            ChatEvent::Started { session_id, .. } => session_id,
            ChatEvent::Chunk { session_id, .. } => session_id,
            ChatEvent::Complete { session_id, .. } => session_id,
            ChatEvent::Error { session_id, .. } => session_id,
            ChatEvent::Cancelled { session_id, .. } => session_id,
        }
    }

    /// Check if this is a terminal event (ends the thread)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ChatEvent::Complete { .. } | ChatEvent::Error { .. } | ChatEvent::Cancelled { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::adapters::AdapterError;

    #[test]
    fn test_chat_event_session_id() {
        let sid = "test-session-123";
        assert_eq!(
            ChatEvent::Chunk {
                session_id: sid.to_string(),
                content: "气".to_string()
            }
            .session_id(),
            sid
        );
        assert_eq!(
            ChatEvent::Cancelled {
                session_id: sid.to_string(),
                fragments: 2
            }
            .session_id(),
            sid
        );
    }

    #[test]
    fn test_chat_event_is_terminal() {
        assert!(ChatEvent::Complete {
            session_id: "x".to_string(),
            full_response: "ok".to_string()
        }
        .is_terminal());
        assert!(ChatEvent::Error {
            session_id: "x".to_string(),
            error: EngineError::Transport(AdapterError::Network("down".to_string()))
        }
        .is_terminal());
        assert!(!ChatEvent::Chunk {
            session_id: "x".to_string(),
            content: "chunk".to_string()
        }
        .is_terminal());
        assert!(!ChatEvent::Started {
            session_id: "x".to_string(),
            turns: 1
        }
        .is_terminal());
    }
}
