//! Conversation history window
//!
//! Decides which transcript turns reach the completion service:
//! 1. the scripted greeting is dropped (UI chrome, never sent upstream)
//! 2. only the newest `max_turns` remaining turns are kept
//! 3. relative order is preserved, oldest first
//!
//! Older turns are dropped silently, not summarised.

use crate::config::DEFAULT_HISTORY_WINDOW;
use crate::llm::adapters::LlmMessage;
use crate::llm::contracts::GREETING_MARKER;
use crate::llm::types::Turn;

/// True when the turn is the scripted opening message
pub fn is_greeting(turn: &Turn) -> bool {
    turn.content().contains(GREETING_MARKER)
}

/// Bounded view over the newest turns of a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    max_turns: usize,
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl HistoryWindow {
    /// Window of at most `max_turns` turns (a zero window is widened to one)
    pub fn new(max_turns: usize) -> Self {
        Self {
            max_turns: max_turns.max(1),
        }
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Filtered and trimmed turns, oldest first
    pub fn select<'a>(&self, turns: &'a [Turn]) -> Vec<&'a Turn> {
        let kept: Vec<&Turn> = turns.iter().filter(|t| !is_greeting(t)).collect();
        let skip = kept.len().saturating_sub(self.max_turns);
        if skip > 0 {
            tracing::debug!(dropped = skip, kept = self.max_turns, "trimming chat history");
        }
        kept.into_iter().skip(skip).collect()
    }

    /// Request messages: `system` first, then the selected turns 1:1
    pub fn build_messages(&self, system: String, turns: &[Turn]) -> Vec<LlmMessage> {
        let selected = self.select(turns);
        let mut messages = Vec::with_capacity(selected.len() + 1);
        messages.push(LlmMessage::system(system));
        messages.extend(selected.into_iter().map(LlmMessage::from));
        messages
    }
}
