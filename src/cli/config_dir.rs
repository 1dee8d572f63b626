//! config_dir resolution
//!
//! Priority:
//! 1. --config-dir <path> flag (must exist)
//! 2. $TCM_HELPER_HOME env var
//! 3. Current directory "."

use crate::cli::{Error, Result};
use std::path::PathBuf;

/// Environment variable naming the config directory
pub const HOME_ENV: &str = "TCM_HELPER_HOME";

/// Resolve config_dir according to the priority above
pub fn resolve_config_dir(explicit: Option<String>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        let path_buf = PathBuf::from(&path);
        if !path_buf.is_dir() {
            return Err(Error::InvalidArgs(format!(
                "config dir '{}' does not exist",
                path
            )));
        }
        return Ok(path_buf);
    }

    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.trim().is_empty() {
            // Created on demand by the log setup if missing
            return Ok(PathBuf::from(home));
        }
    }

    Ok(PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_explicit_config_dir() {
        let temp_dir = TempDir::new().unwrap();
        let explicit = temp_dir.path().to_str().unwrap().to_string();

        let resolved = resolve_config_dir(Some(explicit.clone())).unwrap();
        assert_eq!(resolved, PathBuf::from(explicit));
    }

    #[test]
    fn test_resolve_explicit_nonexistent_fails() {
        let result = resolve_config_dir(Some("/nonexistent/tcm/12345".to_string()));
        assert!(matches!(result, Err(Error::InvalidArgs(_))));
    }

    #[test]
    fn test_resolve_env_then_cwd() {
        let temp_dir = TempDir::new().unwrap();

        std::env::set_var(HOME_ENV, temp_dir.path());
        let from_env = resolve_config_dir(None).unwrap();
        std::env::remove_var(HOME_ENV);
        assert_eq!(from_env, temp_dir.path());

        assert_eq!(resolve_config_dir(None).unwrap(), PathBuf::from("."));
    }
}
