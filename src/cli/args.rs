//! CLI argument parsing
//!
//! ```text
//! tcm-helper [--config-dir <path>] [--preset basic|detailed] [--log-level <level>]
//! ```

use crate::llm::types::PromptPreset;
use clap::Parser;

/// Parsed CLI arguments
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "tcm-helper",
    version,
    about = "中医养生小助手: terminal TCM wellness chat"
)]
pub struct Args {
    /// Directory holding config.toml, secrets.toml and logs/
    #[arg(long, value_name = "PATH")]
    pub config_dir: Option<String>,

    /// Prompt preset (overrides config.toml)
    #[arg(long, value_parser = parse_preset)]
    pub preset: Option<PromptPreset>,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

fn parse_preset(s: &str) -> Result<PromptPreset, String> {
    s.parse::<PromptPreset>().map_err(|e| e.to_string())
}

/// Parse from any argument iterator (program name first)
pub fn parse_args<I, T>(args: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Args::try_parse_from(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = parse_args(["tcm-helper"]).unwrap();
        assert_eq!(args.config_dir, None);
        assert_eq!(args.preset, None);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_all_flags() {
        let args = parse_args([
            "tcm-helper",
            "--config-dir",
            "/tmp/tcm",
            "--preset",
            "basic",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.config_dir.as_deref(), Some("/tmp/tcm"));
        assert_eq!(args.preset, Some(PromptPreset::Basic));
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn test_unknown_preset_rejected() {
        assert!(parse_args(["tcm-helper", "--preset", "verbose"]).is_err());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(parse_args(["tcm-helper", "--db-root", "."]).is_err());
    }
}
