//! Text rendering for the terminal surface
//!
//! Every function returns a styled `String`; the binary decides when to
//! print. Styling uses crossterm's `Stylize`, which emits ANSI sequences.

use crossterm::style::Stylize;

use crate::llm::contracts::SECTION_HEADERS;
use crate::llm::types::{Speaker, Turn};
use crate::ui::page::Page;
use crate::ui::sections::AnalysisSections;
use crate::ui::state::{App, ChatSession};
use crate::ui::symptoms::{SymptomPicks, CATALOGUE};
use crate::ui::tips::{AFTER_ANALYSIS, DISCLAIMER, TIMELY_CARE, URGENT_CARE};

const RULE: &str = "────────────────────────────────────────";

pub fn render_banner() -> String {
    format!(
        "{}\n{}\n{}\n",
        "🏥 中医智能小助手".bold().green(),
        "结合传统中医智慧与现代AI技术，为您提供个性化养生建议".dark_grey(),
        RULE
    )
}

/// Welcome page: analysis form state and next steps
pub fn render_welcome(app: &App) -> String {
    let profile = app.session.profile();
    let age = profile
        .age
        .map(|a| format!("{}岁", a))
        .unwrap_or_else(|| "未提供".to_string());
    let picked = if app.picks.is_empty() {
        "（无）".to_string()
    } else {
        app.picks.joined()
    };

    let mut out = String::new();
    out.push_str(&format!("{}\n", "📝 症状分析".bold()));
    out.push_str(&format!("  已选症状：{}\n", picked));
    out.push_str(&format!(
        "  年龄：{}    性别：{}    持续时间：{}\n",
        age,
        profile.gender.label(),
        app.duration.label()
    ));
    out.push_str(&format!(
        "{}\n",
        "输入 /tags 选择症状，/analyze 开始分析，/start 进入对话，/help 查看全部命令".dark_grey()
    ));
    out
}

/// Quick-pick catalogue with stable numbers, marking current picks
pub fn render_tags(picks: &SymptomPicks) -> String {
    let mut out = format!("{}\n", "💡 常见症状快速选择".bold());
    let mut n = 0usize;
    for category in CATALOGUE.iter() {
        out.push_str(&format!("🔹 {}\n  ", category.name.cyan()));
        let items: Vec<String> = category
            .symptoms
            .iter()
            .map(|s| {
                n += 1;
                if picks.selected().iter().any(|p| p == s) {
                    format!("{}", format!("[{:>2}] {} ✓", n, s).green())
                } else {
                    format!("[{:>2}] {}", n, s)
                }
            })
            .collect();
        out.push_str(&items.join("  "));
        out.push('\n');
    }
    out
}

pub fn render_turn(turn: &Turn) -> String {
    match turn.role() {
        Speaker::User => format!("{} {}", "👤 您：".bold().cyan(), turn.content()),
        Speaker::Assistant if turn.is_pending() => {
            format!("{} {}", "🌿 小助手：".bold().green(), turn.content().dark_grey())
        }
        Speaker::Assistant => format!("{} {}", "🌿 小助手：".bold().green(), turn.content()),
        Speaker::System => format!("{}", turn.content().dark_grey()),
    }
}

pub fn render_transcript(session: &ChatSession) -> String {
    session
        .transcript()
        .iter()
        .map(render_turn)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Prefix printed before streamed fragments of a reply
pub fn render_reply_prefix() -> String {
    format!("{} ", "🌿 小助手：".bold().green())
}

/// Footer after a streamed analysis: which contract sections arrived
pub fn render_analysis_summary(sections: &AnalysisSections) -> String {
    let marks: Vec<String> = SECTION_HEADERS
        .iter()
        .map(|h| {
            let title = h.trim_start_matches('#').trim();
            if sections.get(h).is_some() {
                format!("{}", format!("✓ {}", title).green())
            } else {
                format!("{}", format!("✗ {}", title).dark_grey())
            }
        })
        .collect();
    format!("{}\n{}\n{}\n", RULE, marks.join("  "), AFTER_ANALYSIS.yellow())
}

pub fn render_confirm_exit() -> String {
    format!(
        "{}\n{}\n",
        "确定要结束本次对话并返回欢迎页吗？对话记录将被清空。".bold().yellow(),
        "输入 /yes 确认，/no 继续对话".dark_grey()
    )
}

pub fn render_error(message: &str) -> String {
    format!("{} {}", "❌".red(), message.red())
}

pub fn render_notice(message: &str) -> String {
    format!("{} {}", "✅".green(), message)
}

pub fn render_tip(tip: &str) -> String {
    format!("{} {}", "💡 养生小贴士：".bold(), tip)
}

pub fn render_care_guidance() -> String {
    let urgent: Vec<String> = URGENT_CARE.iter().map(|s| format!("  🚨 {}", s)).collect();
    let timely: Vec<String> = TIMELY_CARE.iter().map(|s| format!("  ⚠️ {}", s)).collect();
    format!(
        "{}\n{}\n{}\n{}\n{}\n",
        "立即就医的情况：".bold().red(),
        urgent.join("\n"),
        "及时就医的情况：".bold().yellow(),
        timely.join("\n"),
        DISCLAIMER.dark_grey()
    )
}

/// Input prompt for the current page
pub fn render_prompt(page: Page) -> String {
    let marker = match page {
        Page::Welcome => "欢迎",
        Page::Chat => "对话",
        Page::ConfirmExit => "确认",
    };
    format!("{} ", format!("[{}] ›", marker).bold())
}
