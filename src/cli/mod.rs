//! CLI module
//!
//! Provides:
//! - Argument parsing (clap)
//! - config_dir resolution (flag → env → cwd)

pub mod args;
pub mod config_dir;

// Re-exports
pub use args::{parse_args, Args};
pub use config_dir::{resolve_config_dir, HOME_ENV};

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, Error>;
