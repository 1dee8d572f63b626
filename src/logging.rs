//! Logging setup
//!
//! Events go to a daily-rotated file under `<config_dir>/logs/` so they never
//! interleave with the terminal conversation. `RUST_LOG` overrides the
//! level passed on the command line.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log directory under the config directory
pub const LOG_DIR: &str = "logs";

/// Log file prefix; the appender adds the date suffix
pub const LOG_FILE_PREFIX: &str = "tcm-helper.log";

/// Logging errors
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("cannot create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid log filter: {0}")]
    Filter(String),

    #[error("logging already initialised: {0}")]
    AlreadyInitialised(String),
}

/// Filter from `RUST_LOG`, falling back to `default_level`
pub fn build_filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(format!("warn,tcm_helper={}", default_level))
            .map_err(|e| LoggingError::Filter(e.to_string())),
    }
}

/// Install the global subscriber
///
/// Keep the returned guard alive for the whole process; dropping it flushes
/// and stops the background writer.
pub fn init_logging(config_dir: &Path, default_level: &str) -> Result<WorkerGuard, LoggingError> {
    let log_dir = config_dir.join(LOG_DIR);
    std::fs::create_dir_all(&log_dir).map_err(|source| LoggingError::CreateDir {
        path: log_dir.clone(),
        source,
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    tracing_subscriber::registry()
        .with(build_filter(default_level)?)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialised(e.to_string()))?;

    tracing::debug!(dir = %log_dir.display(), "logging initialised");
    Ok(guard)
}
