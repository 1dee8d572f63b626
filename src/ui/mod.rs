//! Terminal presentation state
//!
//! Everything here is free of terminal I/O so the binary only has
//! to read lines and print what `view` renders:
//! - page flow (Welcome → Chat → ConfirmExit)
//! - the chat session and its transcript
//! - quick-pick symptom catalogue, command parsing, section splitting

pub mod input;
pub mod page;
pub mod sections;
pub mod state;
pub mod symptoms;
pub mod tips;
pub mod view;

// Re-exports
pub use input::{parse_command, render_help, Command};
pub use page::Page;
pub use sections::{split_sections, AnalysisSections, Section};
pub use state::{App, ChatSession};
pub use symptoms::{SymptomCategory, SymptomPicks, CATALOGUE};
pub use tips::{random_tip, TIPS};

/// UI result type
pub type Result<T> = std::result::Result<T, UiError>;

/// UI errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UiError {
    #[error("cannot go from {from:?} to {to:?}")]
    InvalidTransition { from: Page, to: Page },

    #[error("请先输入症状描述")]
    EmptyInput,

    #[error("上一条回复尚未完成，请稍候")]
    ReplyInFlight,

    #[error("no reply is in flight")]
    NoReplyInFlight,

    #[error("未知命令：/{0}（输入 /help 查看帮助）")]
    UnknownCommand(String),

    #[error("/{command}: {reason}")]
    InvalidArgument { command: String, reason: String },

    #[error("该操作在当前页面不可用（{0:?}）")]
    WrongPage(Page),
}
