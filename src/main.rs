//! tcm-helper: line-oriented terminal surface
//!
//! Pages:
//! - Welcome: quick-pick symptoms, profile, single-shot analysis
//! - Chat: multi-turn conversation streamed from a background thread
//! - ConfirmExit: /yes returns to Welcome (session cleared), /no resumes
//!
//! EXIT: /quit works from any page; EOF (Ctrl+D) also exits.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use tcm_helper::cli::{resolve_config_dir, Args, EXIT_FAILURE, EXIT_SUCCESS};
use tcm_helper::llm::ConversationEngine;
use tcm_helper::logging::init_logging;
use tcm_helper::ui::state::ChatUpdate;
use tcm_helper::ui::{input, symptoms, view};
use tcm_helper::ui::{parse_command, random_tip, split_sections, App, Command, Page, UiError};

fn main() {
    let args = Args::parse();

    let code = match run(args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("{}", view::render_error(&format!("{:#}", e)));
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}

fn run(args: Args) -> anyhow::Result<()> {
    // A missing .env is normal
    let _ = dotenvy::dotenv();

    let config_dir = resolve_config_dir(args.config_dir.clone())?;
    let _log_guard = init_logging(&config_dir, &args.log_level).context("日志初始化失败")?;
    tracing::info!(config_dir = %config_dir.display(), "starting tcm-helper");

    let mut engine = ConversationEngine::from_config_dir(&config_dir).context("启动失败")?;
    if let Some(preset) = args.preset {
        engine.set_preset(preset);
    }
    let engine = Arc::new(engine);

    let mut app = App::new();
    let mut out = io::stdout();
    writeln!(out, "{}", view::render_banner())?;
    writeln!(out, "{}", view::render_welcome(&app))?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        write!(out, "{}", view::render_prompt(app.page))?;
        out.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{}", view::render_error(&e.to_string()))?;
                continue;
            }
        };

        if let Err(e) = dispatch(&mut app, &engine, command, &mut out) {
            writeln!(out, "{}", view::render_error(&e.to_string()))?;
        }
        if app.should_quit {
            break;
        }
    }

    app.cancel_chat();
    tracing::info!("tcm-helper exiting");
    writeln!(out, "再见，祝您身体健康！🌿")?;
    Ok(())
}

/// Errors a command can raise without ending the program
#[derive(Debug, thiserror::Error)]
enum DispatchError {
    #[error("{0}")]
    Ui(#[from] UiError),
    #[error("{0}")]
    Io(#[from] io::Error),
}

fn dispatch(
    app: &mut App,
    engine: &Arc<ConversationEngine>,
    command: Command,
    out: &mut impl Write,
) -> Result<(), DispatchError> {
    match command {
        Command::None => {}
        Command::Quit => app.should_quit = true,
        Command::Help => writeln!(out, "{}", input::render_help())?,
        Command::Tip => writeln!(out, "{}", view::render_tip(random_tip()))?,
        Command::Tags => writeln!(out, "{}", view::render_tags(&app.picks))?,
        Command::Age(age) => {
            app.session.set_age(age);
            let shown = age.map(|a| format!("{}岁", a)).unwrap_or_else(|| "未提供".to_string());
            writeln!(out, "{}", view::render_notice(&format!("年龄：{}", shown)))?;
        }
        Command::Gender(gender) => {
            app.session.set_gender(gender);
            writeln!(out, "{}", view::render_notice(&format!("性别：{}", gender)))?;
        }
        Command::Duration(duration) => {
            app.duration = duration;
            writeln!(out, "{}", view::render_notice(&format!("持续时间：{}", duration)))?;
        }
        Command::Clear => {
            app.picks.clear();
            writeln!(out, "{}", view::render_notice("已清空已选症状"))?;
        }
        Command::Pick(n) => {
            let Some(symptom) = symptoms::by_number(n) else {
                return Ok(());
            };
            if app.page == Page::Chat {
                app.send_chat(engine.clone(), symptom)?;
                stream_chat_reply(app, out)?;
            } else {
                app.picks.pick(symptom);
                writeln!(out, "{}", view::render_notice(&format!("已选症状：{}", app.picks.joined())))?;
            }
        }
        Command::Analyze(extra) => {
            if app.page != Page::Welcome {
                return Err(UiError::WrongPage(app.page).into());
            }
            run_analysis(app, engine, &extra, out)?;
        }
        Command::Start => {
            app.start_chat()?;
            writeln!(out, "{}\n", view::render_transcript(&app.session))?;
        }
        Command::Chat(text) => match app.page {
            Page::Chat => {
                app.send_chat(engine.clone(), &text)?;
                stream_chat_reply(app, out)?;
            }
            Page::Welcome => {
                writeln!(
                    out,
                    "{}",
                    view::render_error("请输入 /start 进入对话，或 /analyze <症状描述> 进行分析")
                )?;
            }
            Page::ConfirmExit => writeln!(out, "{}", view::render_confirm_exit())?,
        },
        Command::Reset => {
            if app.page != Page::Chat {
                return Err(UiError::WrongPage(app.page).into());
            }
            app.reset_chat();
            writeln!(out, "{}\n", view::render_transcript(&app.session))?;
        }
        Command::Exit => {
            app.request_exit()?;
            writeln!(out, "{}", view::render_confirm_exit())?;
        }
        Command::Yes => {
            app.confirm_exit()?;
            writeln!(out, "{}", view::render_welcome(app))?;
        }
        Command::No => {
            app.cancel_exit()?;
            writeln!(out, "{}", view::render_notice("继续对话"))?;
        }
    }
    Ok(())
}

/// Print fragments as they arrive until the reply ends
fn stream_chat_reply(app: &mut App, out: &mut impl Write) -> io::Result<()> {
    write!(out, "{}", view::render_reply_prefix())?;
    out.flush()?;
    while let Some(update) = app.next_chat_update() {
        match update {
            ChatUpdate::Fragment(text) => {
                write!(out, "{}", text)?;
                out.flush()?;
            }
            ChatUpdate::Completed => {
                writeln!(out, "\n")?;
                break;
            }
            ChatUpdate::Failed(message) => {
                writeln!(out)?;
                writeln!(out, "{}", view::render_error(&format!("回复失败：{}", message)))?;
                break;
            }
            ChatUpdate::Cancelled => {
                writeln!(out, "\n{}", view::render_error("回复已中断"))?;
                break;
            }
            ChatUpdate::Ignored => {}
        }
    }
    Ok(())
}

fn run_analysis(
    app: &mut App,
    engine: &ConversationEngine,
    extra: &str,
    out: &mut impl Write,
) -> Result<(), DispatchError> {
    let request = app.analysis_request(extra)?;
    writeln!(out, "{}", view::render_notice("AI正在分析您的症状，请稍候..."))?;

    let stream = match engine.run_analysis(&request) {
        Ok(stream) => stream,
        Err(e) => {
            writeln!(out, "{}", view::render_error(&format!("分析过程中出现错误：{}", e)))?;
            return Ok(());
        }
    };

    let mut reply = String::new();
    for fragment in stream {
        match fragment {
            Ok(text) => {
                write!(out, "{}", text)?;
                out.flush()?;
                reply.push_str(&text);
            }
            Err(e) => {
                writeln!(out)?;
                writeln!(out, "{}", view::render_error(&format!("分析过程中出现错误：{}", e)))?;
                return Ok(());
            }
        }
    }
    writeln!(out, "\n")?;
    writeln!(out, "{}", view::render_analysis_summary(&split_sections(&reply)))?;
    writeln!(out, "{}", view::render_care_guidance())?;
    app.last_analysis = Some(reply);
    Ok(())
}
