//! Chat thread management
//!
//! Runs one chat reply on a background thread so the terminal stays
//! responsive. The thread does only completion I/O; the caller owns the
//! session and applies the events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::llm::chat_events::{ChatEvent, ChatSender};
use crate::llm::engine::ConversationEngine;
use crate::llm::types::{Turn, UserProfile};

/// Active chat thread handle (for cleanup)
#[derive(Debug)]
pub struct ChatThreadHandle {
    handle: Option<JoinHandle<()>>,
    cancel: Arc<AtomicBool>,
    session_id: String,
}

impl ChatThreadHandle {
    fn new(handle: JoinHandle<()>, cancel: Arc<AtomicBool>, session_id: String) -> Self {
        Self {
            handle: Some(handle),
            cancel,
            session_id,
        }
    }

    /// Request cancellation; checked between fragments
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Join thread with timeout
    pub fn join_timeout(mut self, duration: Duration) -> Result<(), ThreadTimeoutError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        let start = Instant::now();
        while start.elapsed() < duration {
            if handle.is_finished() {
                return handle.join().map_err(|_| ThreadTimeoutError::JoinError);
            }
            thread::sleep(Duration::from_millis(20));
        }
        self.cancel();
        Err(ThreadTimeoutError::Timeout {
            session_id: self.session_id,
            elapsed: start.elapsed(),
        })
    }
}

/// Thread timeout error
#[derive(Debug, thiserror::Error)]
pub enum ThreadTimeoutError {
    #[error("Chat thread {session_id:?} timed out after {elapsed:?}")]
    Timeout {
        session_id: String,
        elapsed: Duration,
    },
    #[error("Chat thread failed to join")]
    JoinError,
}

/// Spawn a background chat thread
///
/// `transcript` must already exclude the in-flight placeholder. Exactly one
/// terminal event is sent per run: `Complete`, `Error` or `Cancelled`.
pub fn spawn_chat_thread(
    engine: Arc<ConversationEngine>,
    transcript: Vec<Turn>,
    profile: UserProfile,
    tx: ChatSender,
    session_id: String,
) -> ChatThreadHandle {
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_flag = cancel.clone();
    let handle_session_id = session_id.clone();

    let _ = tx.send(ChatEvent::Started {
        session_id: session_id.clone(),
        turns: transcript.len(),
    });

    let handle = thread::spawn(move || {
        let span = tracing::info_span!("chat_thread", session = %session_id);
        let _entered = span.enter();

        let mut stream = match engine.run_chat(&transcript, &profile) {
            Ok(stream) => stream,
            Err(error) => {
                let _ = tx.send(ChatEvent::Error { session_id, error });
                return;
            }
        };

        let mut full_response = String::new();
        loop {
            if cancel_flag.load(Ordering::Relaxed) {
                let fragments = stream.fragments_yielded();
                stream.cancel();
                let _ = tx.send(ChatEvent::Cancelled {
                    session_id,
                    fragments,
                });
                return;
            }
            let Some(item) = stream.next() else {
                break;
            };
            match item {
                Ok(content) => {
                    full_response.push_str(&content);
                    if tx
                        .send(ChatEvent::Chunk {
                            session_id: session_id.clone(),
                            content,
                        })
                        .is_err()
                    {
                        tracing::debug!("receiver dropped, abandoning reply");
                        return;
                    }
                }
                Err(error) => {
                    let _ = tx.send(ChatEvent::Error { session_id, error });
                    return;
                }
            }
        }

        tracing::debug!(
            fragments = stream.fragments_yielded(),
            reply_len = full_response.len(),
            "chat complete"
        );
        let _ = tx.send(ChatEvent::Complete {
            session_id,
            full_response,
        });
    });

    ChatThreadHandle::new(handle, cancel, handle_session_id)
}

/// Generate a session ID (`chat-<uuid v4>`)
pub fn generate_session_id() -> String {
    format!("chat-{}", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineConfig, SECRETS_FILE};
    use crate::llm::adapters::transport::FakeTransport;
    use crate::llm::adapters::{AdapterError, Transport};
    use crate::llm::credentials::CredentialResolver;
    use crate::llm::engine::EngineError;
    use std::sync::mpsc::channel;
    use tempfile::TempDir;

    fn engine(fake: FakeTransport, var: &str) -> Arc<ConversationEngine> {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SECRETS_FILE), format!("{} = \"sk-test\"\n", var))
            .unwrap();
        Arc::new(
            ConversationEngine::with_transport(
                EngineConfig::default(),
                &CredentialResolver::for_config_dir(dir.path(), var),
                Transport::fake(Arc::new(fake)),
            )
            .unwrap(),
        )
    }

    fn collect(rx: std::sync::mpsc::Receiver<ChatEvent>) -> Vec<ChatEvent> {
        rx.into_iter().collect()
    }

    #[test]
    fn test_generate_session_id() {
        let id1 = generate_session_id();
        let id2 = generate_session_id();
        assert!(id1.starts_with("chat-"));
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_thread_timeout_error_display() {
        let err = ThreadTimeoutError::Timeout {
            session_id: "test-123".to_string(),
            elapsed: Duration::from_secs(5),
        };
        assert!(err.to_string().contains("timed out"));
        assert!(ThreadTimeoutError::JoinError
            .to_string()
            .contains("failed to join"));
    }

    #[test]
    fn test_thread_streams_chunks_then_completes() {
        let body = "data: {\"choices\":[{\"delta\":{\"content\":\"多\"}}]}\n\
                    data: {\"choices\":[{\"delta\":{\"content\":\"喝水\"}}]}\n\
                    data: [DONE]\n";
        let engine = engine(FakeTransport::with_stream("", body), "TCM_THREAD_TEST_OK");
        let (tx, rx) = channel();

        let handle = spawn_chat_thread(
            engine,
            vec![Turn::user("口干")],
            UserProfile::default(),
            tx,
            "s1".to_string(),
        );
        handle.join_timeout(Duration::from_secs(5)).unwrap();

        let events = collect(rx);
        assert!(matches!(events[0], ChatEvent::Started { turns: 1, .. }));
        let chunks: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                ChatEvent::Chunk { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(chunks, vec!["多", "喝水"]);
        match events.last().unwrap() {
            ChatEvent::Complete { full_response, .. } => assert_eq!(full_response, "多喝水"),
            other => panic!("unexpected terminal event: {:?}", other),
        }
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    }

    #[test]
    fn test_thread_reports_request_failure() {
        let engine = engine(
            FakeTransport::with_adapter_error(AdapterError::Http {
                status: 500,
                message: "boom".to_string(),
            }),
            "TCM_THREAD_TEST_ERR",
        );
        let (tx, rx) = channel();

        let handle = spawn_chat_thread(
            engine,
            vec![Turn::user("头晕")],
            UserProfile::default(),
            tx,
            "s2".to_string(),
        );
        handle.join_timeout(Duration::from_secs(5)).unwrap();

        let events = collect(rx);
        assert!(matches!(
            events.last(),
            Some(ChatEvent::Error {
                error: EngineError::Transport(AdapterError::Http { status: 500, .. }),
                ..
            })
        ));
    }
}
