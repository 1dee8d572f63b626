//! Application state
//!
//! State is split between:
//! - `ChatSession`: transcript, profile, in-flight flag, session id
//! - `App`: page, quick-pick selection, analysis form, chat thread plumbing
//!
//! One reply may be in flight per session. Events from a thread started
//! before the last reset carry a stale session id and are ignored.

use crate::llm::chat_events::{ChatEvent, ChatReceiver};
use crate::llm::chat_thread::{generate_session_id, spawn_chat_thread, ChatThreadHandle};
use crate::llm::contracts::greeting;
use crate::llm::engine::{ConversationEngine, EngineError};
use crate::llm::types::{
    Age, AnalysisRequest, Gender, SymptomDuration, Transcript, Turn, UserProfile,
};
use crate::ui::page::Page;
use crate::ui::symptoms::SymptomPicks;
use crate::ui::{Result, UiError};
use std::sync::mpsc::channel;
use std::sync::Arc;

/// Prefix of the turn that replaces a failed reply
pub const ERROR_TURN_PREFIX: &str = "❌ 回复失败：";

/// Content of the turn that replaces a cancelled reply
pub const CANCELLED_TURN: &str = "（回复已中断）";

/// One conversation: transcript plus the metadata sent with it
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: String,
    transcript: Transcript,
    profile: UserProfile,
    generating: bool,
    /// Fragments of the in-flight reply, for display only
    partial: String,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// New session opened by the scripted greeting
    pub fn new() -> Self {
        let mut transcript = Transcript::new();
        transcript.push(Turn::assistant(greeting()));
        Self {
            id: generate_session_id(),
            transcript,
            profile: UserProfile::default(),
            generating: false,
            partial: String::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn profile(&self) -> UserProfile {
        self.profile
    }

    pub fn set_age(&mut self, age: Option<Age>) {
        self.profile.age = age;
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.profile.gender = gender;
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn partial(&self) -> &str {
        &self.partial
    }

    /// Append a user turn and the reply placeholder
    ///
    /// The text is kept verbatim; only its emptiness is judged trimmed.
    pub fn submit(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(UiError::EmptyInput);
        }
        if self.generating {
            return Err(UiError::ReplyInFlight);
        }
        self.transcript.push(Turn::user(text));
        self.transcript.push(Turn::pending());
        self.generating = true;
        self.partial.clear();
        Ok(())
    }

    /// Record a streamed fragment of the in-flight reply
    pub fn push_fragment(&mut self, fragment: &str) {
        if self.generating {
            self.partial.push_str(fragment);
        }
    }

    /// Replace the placeholder with the finished reply
    pub fn complete_reply(&mut self, text: impl Into<String>) -> Result<()> {
        self.finish(Turn::assistant(text))
    }

    /// Replace the placeholder with an explicit error turn
    ///
    /// Fragments received before the failure are discarded.
    pub fn fail_reply(&mut self, error: &EngineError) -> Result<()> {
        self.finish(Turn::assistant(format!("{}{}", ERROR_TURN_PREFIX, error)))
    }

    /// Replace the placeholder after a user cancellation
    pub fn cancel_reply(&mut self) -> Result<()> {
        self.finish(Turn::assistant(CANCELLED_TURN))
    }

    fn finish(&mut self, turn: Turn) -> Result<()> {
        if !self.generating || !self.transcript.replace_pending(turn) {
            return Err(UiError::NoReplyInFlight);
        }
        self.generating = false;
        self.partial.clear();
        Ok(())
    }

    /// Turns to send with the next request (placeholder excluded)
    pub fn request_transcript(&self) -> Vec<Turn> {
        self.transcript
            .iter()
            .filter(|t| !t.is_pending())
            .cloned()
            .collect()
    }

    /// Back to the greeting only; the profile is kept
    pub fn reset(&mut self) {
        let profile = self.profile;
        *self = Self::new();
        self.profile = profile;
        tracing::info!(session = %self.id, "chat session reset");
    }
}

/// What an applied chat event changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatUpdate {
    Fragment(String),
    Completed,
    Failed(String),
    Cancelled,
    /// Event belonged to an earlier session or carried nothing to apply
    Ignored,
}

/// Main application state
pub struct App {
    pub page: Page,
    pub session: ChatSession,
    /// Quick-pick selection for the analysis form
    pub picks: SymptomPicks,
    pub duration: SymptomDuration,
    /// Last finished analysis reply
    pub last_analysis: Option<String>,
    /// Should quit
    pub should_quit: bool,
    chat_thread_handle: Option<ChatThreadHandle>,
    chat_event_receiver: Option<ChatReceiver>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            page: Page::Welcome,
            session: ChatSession::new(),
            picks: SymptomPicks::new(),
            duration: SymptomDuration::default(),
            last_analysis: None,
            should_quit: false,
            chat_thread_handle: None,
            chat_event_receiver: None,
        }
    }

    fn go(&mut self, to: Page) -> Result<()> {
        self.page = self.page.transition(to)?;
        Ok(())
    }

    /// Welcome → Chat
    pub fn start_chat(&mut self) -> Result<()> {
        self.go(Page::Chat)
    }

    /// Chat → ConfirmExit
    pub fn request_exit(&mut self) -> Result<()> {
        self.go(Page::ConfirmExit)
    }

    /// ConfirmExit → Welcome; the session starts over
    pub fn confirm_exit(&mut self) -> Result<()> {
        self.go(Page::Welcome)?;
        self.cancel_chat();
        self.session.reset();
        Ok(())
    }

    /// ConfirmExit → Chat
    pub fn cancel_exit(&mut self) -> Result<()> {
        self.go(Page::Chat)
    }

    /// Reset the chat without leaving the page
    pub fn reset_chat(&mut self) {
        self.cancel_chat();
        self.session.reset();
    }

    /// Analysis input from the form state
    pub fn analysis_request(&self, extra: &str) -> Result<AnalysisRequest> {
        let symptoms = self.picks.compose(extra);
        if symptoms.is_empty() {
            return Err(UiError::EmptyInput);
        }
        let profile = self.session.profile();
        Ok(AnalysisRequest::new(
            symptoms,
            profile.age,
            profile.gender,
            self.duration,
        ))
    }

    /// Submit `text` and start the reply on a background thread
    pub fn send_chat(&mut self, engine: Arc<ConversationEngine>, text: &str) -> Result<()> {
        if self.page != Page::Chat {
            return Err(UiError::WrongPage(self.page));
        }
        self.session.submit(text)?;

        let (tx, rx) = channel();
        let handle = spawn_chat_thread(
            engine,
            self.session.request_transcript(),
            self.session.profile(),
            tx,
            self.session.id().to_string(),
        );
        self.chat_thread_handle = Some(handle);
        self.chat_event_receiver = Some(rx);
        Ok(())
    }

    pub fn chat_in_flight(&self) -> bool {
        self.session.is_generating()
    }

    /// Stop the running reply, if any, and mark it interrupted
    pub fn cancel_chat(&mut self) {
        if let Some(handle) = self.chat_thread_handle.take() {
            handle.cancel();
        }
        self.chat_event_receiver = None;
        if self.session.is_generating() {
            let _ = self.session.cancel_reply();
        }
    }

    /// Apply one event from the chat thread
    pub fn apply_chat_event(&mut self, event: ChatEvent) -> ChatUpdate {
        if event.session_id() != self.session.id() {
            tracing::debug!(event_session = event.session_id(), "ignoring stale chat event");
            return ChatUpdate::Ignored;
        }
        let terminal = event.is_terminal();
        let update = match event {
            ChatEvent::Started { .. } => ChatUpdate::Ignored,
            ChatEvent::Chunk { content, .. } => {
                self.session.push_fragment(&content);
                ChatUpdate::Fragment(content)
            }
            ChatEvent::Complete { full_response, .. } => {
                match self.session.complete_reply(full_response) {
                    Ok(()) => ChatUpdate::Completed,
                    Err(_) => ChatUpdate::Ignored,
                }
            }
            ChatEvent::Error { error, .. } => {
                let message = error.to_string();
                match self.session.fail_reply(&error) {
                    Ok(()) => ChatUpdate::Failed(message),
                    Err(_) => ChatUpdate::Ignored,
                }
            }
            ChatEvent::Cancelled { .. } => match self.session.cancel_reply() {
                Ok(()) => ChatUpdate::Cancelled,
                Err(_) => ChatUpdate::Ignored,
            },
        };
        if terminal {
            self.chat_thread_handle = None;
            self.chat_event_receiver = None;
        }
        update
    }

    /// Block for the next chat event and apply it
    ///
    /// Returns `None` when no reply is in flight. A thread that vanished
    /// without a terminal event is treated as cancelled.
    pub fn next_chat_update(&mut self) -> Option<ChatUpdate> {
        let rx = self.chat_event_receiver.as_ref()?;
        match rx.recv() {
            Ok(event) => Some(self.apply_chat_event(event)),
            Err(_) => {
                tracing::warn!("chat thread ended without a terminal event");
                self.cancel_chat();
                Some(ChatUpdate::Cancelled)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::adapters::AdapterError;
    use crate::llm::history::is_greeting;

    #[test]
    fn test_new_session_holds_greeting_only() {
        let session = ChatSession::new();
        assert_eq!(session.transcript().len(), 1);
        assert!(is_greeting(&session.transcript().turns()[0]));
        assert!(!session.is_generating());
    }

    #[test]
    fn test_submit_rejects_empty_input() {
        let mut session = ChatSession::new();
        assert_eq!(session.submit("   \n"), Err(UiError::EmptyInput));
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn test_second_submit_rejected_while_generating() {
        let mut session = ChatSession::new();
        session.submit("头晕").unwrap();
        assert_eq!(session.submit("还有耳鸣"), Err(UiError::ReplyInFlight));
        assert_eq!(session.transcript().len(), 3);
    }

    #[test]
    fn test_request_transcript_excludes_placeholder() {
        let mut session = ChatSession::new();
        session.submit("头晕").unwrap();
        assert!(session.transcript().has_pending());

        let request = session.request_transcript();
        assert_eq!(request.len(), 2);
        assert_eq!(request.last().unwrap().content(), "头晕");
    }

    #[test]
    fn test_complete_reply_replaces_placeholder() {
        let mut session = ChatSession::new();
        session.submit("头晕").unwrap();
        session.push_fragment("能否");
        assert_eq!(session.partial(), "能否");
        session.complete_reply("能否描述持续时间？").unwrap();

        assert!(!session.is_generating());
        assert!(!session.transcript().has_pending());
        assert_eq!(
            session.transcript().last().unwrap().content(),
            "能否描述持续时间？"
        );
        assert_eq!(session.partial(), "");
        assert_eq!(session.complete_reply("again"), Err(UiError::NoReplyInFlight));
    }

    #[test]
    fn test_fail_reply_leaves_error_turn() {
        let mut session = ChatSession::new();
        session.submit("头晕").unwrap();
        session.push_fragment("部分");
        session
            .fail_reply(&EngineError::Transport(AdapterError::Network(
                "connection reset".to_string(),
            )))
            .unwrap();

        let last = session.transcript().last().unwrap().content().to_string();
        assert!(last.starts_with(ERROR_TURN_PREFIX));
        assert!(!last.contains("部分"));
        assert!(session.submit("再试一次").is_ok());
    }

    #[test]
    fn test_reset_keeps_profile_and_new_id() {
        let mut session = ChatSession::new();
        session.set_gender(Gender::Female);
        let old_id = session.id().to_string();
        session.submit("头晕").unwrap();

        session.reset();
        assert_eq!(session.transcript().len(), 1);
        assert!(!session.is_generating());
        assert_eq!(session.profile().gender, Gender::Female);
        assert_ne!(session.id(), old_id);
    }

    #[test]
    fn test_app_page_flow_resets_on_confirm() {
        let mut app = App::new();
        assert!(app.request_exit().is_err());
        app.start_chat().unwrap();
        app.session.submit("头晕").unwrap();
        app.request_exit().unwrap();
        app.cancel_exit().unwrap();
        assert_eq!(app.page, Page::Chat);
        assert!(app.session.is_generating());

        app.request_exit().unwrap();
        app.confirm_exit().unwrap();
        assert_eq!(app.page, Page::Welcome);
        assert_eq!(app.session.transcript().len(), 1);
    }

    #[test]
    fn test_stale_events_ignored() {
        let mut app = App::new();
        app.session.submit("头晕").unwrap();
        let update = app.apply_chat_event(ChatEvent::Complete {
            session_id: "chat-old".to_string(),
            full_response: "旧回复".to_string(),
        });
        assert_eq!(update, ChatUpdate::Ignored);
        assert!(app.session.is_generating());
    }

    #[test]
    fn test_events_drive_session() {
        let mut app = App::new();
        app.session.submit("头晕").unwrap();
        let sid = app.session.id().to_string();

        assert_eq!(
            app.apply_chat_event(ChatEvent::Chunk {
                session_id: sid.clone(),
                content: "多".to_string()
            }),
            ChatUpdate::Fragment("多".to_string())
        );
        assert_eq!(
            app.apply_chat_event(ChatEvent::Complete {
                session_id: sid,
                full_response: "多休息".to_string()
            }),
            ChatUpdate::Completed
        );
        assert_eq!(app.session.transcript().last().unwrap().content(), "多休息");
    }

    #[test]
    fn test_analysis_request_from_form() {
        let mut app = App::new();
        assert_eq!(app.analysis_request(""), Err(UiError::EmptyInput));

        app.picks.pick("容易疲劳");
        app.picks.pick("失眠多梦");
        app.session.set_age(Age::new(28).ok());
        app.session.set_gender(Gender::Female);
        app.duration = SymptomDuration::TwoToFourWeeks;

        let request = app.analysis_request("").unwrap();
        assert_eq!(request.symptoms, "容易疲劳、失眠多梦");
        assert_eq!(request.age.map(|a| a.years()), Some(28));
        assert_eq!(request.gender, Gender::Female);
        assert_eq!(request.duration.label(), "2-4周");
    }
}
