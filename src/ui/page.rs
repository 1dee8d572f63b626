//! Page flow
//!
//! ```text
//! Welcome ──start──▶ Chat ──exit──▶ ConfirmExit ──yes──▶ Welcome
//!                     ▲                   │
//!                     └────────no─────────┘
//! ```

use crate::ui::{Result, UiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Welcome,
    Chat,
    ConfirmExit,
}

impl Page {
    pub fn can_transition_to(self, to: Page) -> bool {
        matches!(
            (self, to),
            (Page::Welcome, Page::Chat)
                | (Page::Chat, Page::ConfirmExit)
                | (Page::ConfirmExit, Page::Welcome)
                | (Page::ConfirmExit, Page::Chat)
        )
    }

    pub fn transition(self, to: Page) -> Result<Page> {
        if self.can_transition_to(to) {
            tracing::debug!(from = ?self, to = ?to, "page transition");
            Ok(to)
        } else {
            Err(UiError::InvalidTransition { from: self, to })
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Welcome => "欢迎",
            Page::Chat => "对话",
            Page::ConfirmExit => "确认退出",
        }
    }
}
