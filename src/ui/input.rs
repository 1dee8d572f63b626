//! Command parsing for the terminal surface
//!
//! INPUT ROUTING:
//! A) COMMAND: input starts with "/" → parsed here, never sent to the model
//! B) CHAT: anything else → chat text (on the Chat page)
//!
//! /quit works from any page and bypasses the exit confirmation.

use crate::llm::types::{Age, Gender, SymptomDuration};
use crate::ui::symptoms;
use crate::ui::{Result, UiError};

/// Parsed command result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    Start,                      // /start: Welcome → Chat
    Tags,                       // /tags: list the quick-pick catalogue
    Pick(usize),                // /pick <n>
    Clear,                      // /clear: drop picked symptoms
    Age(Option<Age>),           // /age <n|->
    Gender(Gender),             // /gender <男|女|->
    Duration(SymptomDuration),  // /duration <n|label>
    Analyze(String),            // /analyze [supplement]
    Reset,                      // /reset: restart the chat
    Exit,                       // /exit: ask for confirmation
    Yes,                        // /yes
    No,                         // /no
    Help,                       // /help
    Tip,                        // /tip
    Quit,                       // /quit, /q: leave immediately
    Chat(String),               // Default: chat text
}

fn invalid(command: &str, reason: impl Into<String>) -> UiError {
    UiError::InvalidArgument {
        command: command.to_string(),
        reason: reason.into(),
    }
}

fn require_arg<'a>(command: &str, arg: Option<&'a str>, usage: &str) -> Result<&'a str> {
    arg.filter(|a| !a.is_empty())
        .ok_or_else(|| invalid(command, format!("用法：/{} {}", command, usage)))
}

fn no_args(command: &str, arg: Option<&str>, parsed: Command) -> Result<Command> {
    match arg {
        Some(a) if !a.is_empty() => Err(invalid(command, "该命令不接受参数")),
        _ => Ok(parsed),
    }
}

/// Parse one input line
///
/// # Examples
/// ```
/// use tcm_helper::ui::input::{parse_command, Command};
///
/// assert_eq!(parse_command("/start").unwrap(), Command::Start);
/// assert_eq!(parse_command("/pick 3").unwrap(), Command::Pick(3));
/// assert!(matches!(parse_command("最近总是失眠").unwrap(), Command::Chat(_)));
/// assert!(parse_command("/unknown").is_err());
/// ```
pub fn parse_command(input: &str) -> Result<Command> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Command::None);
    }

    if !input.starts_with('/') {
        return Ok(Command::Chat(input.to_string()));
    }

    let rest = &input[1..];
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        return Ok(Command::None);
    }

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim);

    match name {
        "start" => no_args(name, arg, Command::Start),
        "tags" => no_args(name, arg, Command::Tags),
        "clear" => no_args(name, arg, Command::Clear),
        "reset" => no_args(name, arg, Command::Reset),
        "exit" => no_args(name, arg, Command::Exit),
        "yes" | "y" => no_args(name, arg, Command::Yes),
        "no" | "n" => no_args(name, arg, Command::No),
        "help" | "h" => no_args(name, arg, Command::Help),
        "tip" => no_args(name, arg, Command::Tip),
        "quit" | "q" => no_args(name, arg, Command::Quit),
        "pick" => {
            let raw = require_arg(name, arg, "<编号>")?;
            let n = raw
                .parse::<usize>()
                .ok()
                .filter(|n| symptoms::by_number(*n).is_some())
                .ok_or_else(|| invalid(name, format!("编号应在 1-{} 之间", symptoms::total())))?;
            Ok(Command::Pick(n))
        }
        "age" => {
            let raw = require_arg(name, arg, "<1-120|->")?;
            if raw == "-" {
                return Ok(Command::Age(None));
            }
            raw.parse::<Age>()
                .map(|age| Command::Age(Some(age)))
                .map_err(|e| invalid(name, e.to_string()))
        }
        "gender" => {
            let raw = require_arg(name, arg, "<男|女|->")?;
            raw.parse::<Gender>()
                .map(Command::Gender)
                .map_err(|e| invalid(name, e.to_string()))
        }
        "duration" => {
            let raw = require_arg(name, arg, "<1-5>")?;
            raw.parse::<SymptomDuration>()
                .map(Command::Duration)
                .map_err(|e| invalid(name, e.to_string()))
        }
        "analyze" | "a" => Ok(Command::Analyze(arg.unwrap_or_default().to_string())),
        other => Err(UiError::UnknownCommand(other.to_string())),
    }
}

/// Render help text
pub fn render_help() -> String {
    let durations = SymptomDuration::ALL
        .iter()
        .enumerate()
        .map(|(i, d)| format!("{}={}", i + 1, d.label()))
        .collect::<Vec<_>>()
        .join("  ");

    format!(
        r#"中医养生小助手 命令一览

欢迎页（症状分析）:
    /tags               查看常见症状快速选择列表
    /pick <编号>        添加一个症状（对话页中直接发送该症状）
    /clear              清空已选症状
    /age <1-120|->      设置年龄（- 表示不提供）
    /gender <男|女|->   设置性别（- 表示不方便透露）
    /duration <编号>    设置症状持续时间：{}
    /analyze [补充描述] 开始分析（已选症状 + 补充描述）
    /start              进入多轮对话

对话页:
    直接输入文字即可与小助手对话
    /reset              清空对话，重新开始
    /exit               返回欢迎页（需确认）
    /yes, /no           确认或取消退出

任何页面:
    /tip                随机养生小贴士
    /help               显示本帮助
    /quit               立即退出程序
"#,
        durations
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_command("").unwrap(), Command::None);
        assert_eq!(parse_command("   ").unwrap(), Command::None);
    }

    #[test]
    fn test_parse_slash_alone() {
        assert_eq!(parse_command("/").unwrap(), Command::None);
        assert_eq!(parse_command("/ start").unwrap(), Command::None);
    }

    #[test]
    fn test_chat_default() {
        assert_eq!(
            parse_command("  两周了  ").unwrap(),
            Command::Chat("两周了".to_string())
        );
        assert!(matches!(parse_command(":help").unwrap(), Command::Chat(_)));
    }

    #[test]
    fn test_parse_flow_commands() {
        assert_eq!(parse_command("/start").unwrap(), Command::Start);
        assert_eq!(parse_command("/exit").unwrap(), Command::Exit);
        assert_eq!(parse_command("/yes").unwrap(), Command::Yes);
        assert_eq!(parse_command("/n").unwrap(), Command::No);
        assert_eq!(parse_command("/q").unwrap(), Command::Quit);
        assert_eq!(parse_command("/reset").unwrap(), Command::Reset);
    }

    #[test]
    fn test_flow_commands_reject_args() {
        assert!(matches!(
            parse_command("/exit now"),
            Err(UiError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_parse_pick() {
        assert_eq!(parse_command("/pick 3").unwrap(), Command::Pick(3));
        assert!(parse_command("/pick").is_err());
        assert!(parse_command("/pick 0").is_err());
        assert!(parse_command("/pick 99").is_err());
        assert!(parse_command("/pick abc").is_err());
    }

    #[test]
    fn test_parse_profile_commands() {
        assert_eq!(
            parse_command("/age 28").unwrap(),
            Command::Age(Some(Age::new(28).unwrap()))
        );
        assert_eq!(parse_command("/age -").unwrap(), Command::Age(None));
        assert!(parse_command("/age 0").is_err());
        assert!(parse_command("/age 200").is_err());

        assert_eq!(parse_command("/gender 女").unwrap(), Command::Gender(Gender::Female));
        assert_eq!(
            parse_command("/gender -").unwrap(),
            Command::Gender(Gender::Undisclosed)
        );
        assert!(parse_command("/gender x").is_err());

        assert_eq!(
            parse_command("/duration 3").unwrap(),
            Command::Duration(SymptomDuration::TwoToFourWeeks)
        );
        assert_eq!(
            parse_command("/duration 3个月以上").unwrap(),
            Command::Duration(SymptomDuration::OverThreeMonths)
        );
    }

    #[test]
    fn test_parse_analyze_with_supplement() {
        assert_eq!(parse_command("/analyze").unwrap(), Command::Analyze(String::new()));
        assert_eq!(
            parse_command("/analyze 晚上盗汗").unwrap(),
            Command::Analyze("晚上盗汗".to_string())
        );
    }

    #[test]
    fn test_unknown_command_is_error() {
        assert_eq!(
            parse_command("/plan"),
            Err(UiError::UnknownCommand("plan".to_string()))
        );
    }

    #[test]
    fn test_help_lists_commands() {
        let help = render_help();
        for cmd in ["/start", "/pick", "/analyze", "/exit", "/quit", "2-4周"] {
            assert!(help.contains(cmd), "missing {}", cmd);
        }
    }
}
