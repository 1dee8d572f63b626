//! API credential resolution
//!
//! Lookup order: secrets store (`secrets.toml`), then the environment.
//! Runs once, at engine construction, so a missing key is reported before
//! any UI state is committed.

use crate::config::{ConfigError, SECRETS_FILE};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where the credential was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    SecretsStore,
    Environment,
}

/// Resolved API key
///
/// Debug output never shows the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    value: String,
    source: CredentialSource,
}

impl Credential {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }

    pub fn into_value(self) -> String {
        self.value
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Secrets-then-environment credential lookup
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    secrets_path: Option<PathBuf>,
    env_var: String,
}

impl CredentialResolver {
    pub fn new(secrets_path: Option<PathBuf>, env_var: impl Into<String>) -> Self {
        Self {
            secrets_path,
            env_var: env_var.into(),
        }
    }

    /// Resolver reading `<config_dir>/secrets.toml`, then `env_var`
    pub fn for_config_dir(config_dir: &Path, env_var: impl Into<String>) -> Self {
        Self::new(Some(config_dir.join(SECRETS_FILE)), env_var)
    }

    pub fn resolve(&self) -> Result<Credential, ConfigError> {
        if let Some(value) = self.from_secrets() {
            tracing::debug!(source = "secrets", "credential resolved");
            return Ok(Credential {
                value,
                source: CredentialSource::SecretsStore,
            });
        }

        if let Some(value) = self.from_environment() {
            tracing::debug!(source = "env", var = %self.env_var, "credential resolved");
            return Ok(Credential {
                value,
                source: CredentialSource::Environment,
            });
        }

        tracing::error!(var = %self.env_var, "no API credential configured");
        Err(ConfigError::MissingCredential {
            env_var: self.env_var.clone(),
            secrets: self
                .secrets_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| SECRETS_FILE.to_string()),
        })
    }

    /// Read the key from the secrets file
    ///
    /// An absent, unreadable or malformed file is not fatal: lookup moves on
    /// to the environment.
    fn from_secrets(&self) -> Option<String> {
        let path = self.secrets_path.as_ref()?;
        if !path.exists() {
            return None;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read secrets file");
                return None;
            }
        };
        let table = match toml::from_str::<toml::Table>(&content) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot parse secrets file");
                return None;
            }
        };

        table
            .get(&self.env_var)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn from_environment(&self) -> Option<String> {
        std::env::var(&self.env_var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_secrets_file_wins_over_env() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SECRETS_FILE),
            "TCM_TEST_KEY_PRIORITY = \"sk-from-secrets\"\n",
        )
        .unwrap();
        std::env::set_var("TCM_TEST_KEY_PRIORITY", "sk-from-env");

        let credential = CredentialResolver::for_config_dir(dir.path(), "TCM_TEST_KEY_PRIORITY")
            .resolve()
            .unwrap();
        assert_eq!(credential.value(), "sk-from-secrets");
        assert_eq!(credential.source(), CredentialSource::SecretsStore);
    }

    #[test]
    fn test_env_used_when_secrets_absent() {
        let dir = TempDir::new().unwrap();
        std::env::set_var("TCM_TEST_KEY_ENV_ONLY", "sk-from-env");

        let credential = CredentialResolver::for_config_dir(dir.path(), "TCM_TEST_KEY_ENV_ONLY")
            .resolve()
            .unwrap();
        assert_eq!(credential.value(), "sk-from-env");
        assert_eq!(credential.source(), CredentialSource::Environment);
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SECRETS_FILE), "TCM_TEST_KEY_BLANK = \"  \"\n").unwrap();
        std::env::set_var("TCM_TEST_KEY_BLANK", "");

        let result = CredentialResolver::for_config_dir(dir.path(), "TCM_TEST_KEY_BLANK").resolve();
        assert!(matches!(result, Err(ConfigError::MissingCredential { .. })));
    }

    #[test]
    fn test_malformed_secrets_falls_through_to_env() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SECRETS_FILE), "not = [valid").unwrap();
        std::env::set_var("TCM_TEST_KEY_MALFORMED", "sk-env");

        let credential = CredentialResolver::for_config_dir(dir.path(), "TCM_TEST_KEY_MALFORMED")
            .resolve()
            .unwrap();
        assert_eq!(credential.source(), CredentialSource::Environment);
    }

    #[test]
    fn test_missing_everywhere_names_the_variable() {
        let result = CredentialResolver::new(None, "TCM_TEST_KEY_NOWHERE").resolve();
        match result {
            Err(ConfigError::MissingCredential { env_var, .. }) => {
                assert_eq!(env_var, "TCM_TEST_KEY_NOWHERE");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_debug_redacts_value() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SECRETS_FILE),
            "TCM_TEST_KEY_REDACT = \"sk-secret-value\"\n",
        )
        .unwrap();
        let credential = CredentialResolver::for_config_dir(dir.path(), "TCM_TEST_KEY_REDACT")
            .resolve()
            .unwrap();
        let rendered = format!("{:?}", credential);
        assert!(!rendered.contains("sk-secret-value"));
        assert!(rendered.contains("redacted"));
    }
}
