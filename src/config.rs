//! Engine configuration
//!
//! Static settings read from `<config_dir>/config.toml`:
//!
//! ```toml
//! [llm]
//! base_url = "https://api.openai.com/v1"
//! model = "gpt-4o-mini"
//! preset = "detailed"
//! history_window = 6
//! ```
//!
//! Every key is optional. A missing file means defaults.

use crate::llm::types::PromptPreset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file location: <config_dir>/config.toml
pub const CONFIG_FILE: &str = "config.toml";

/// Secrets file location: <config_dir>/secrets.toml
pub const SECRETS_FILE: &str = "secrets.toml";

/// Environment variable naming the API key
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default number of recent turns forwarded per chat request
pub const DEFAULT_HISTORY_WINDOW: usize = 6;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("未找到 {env_var}，请在 {secrets} 或环境变量中配置")]
    MissingCredential { env_var: String, secrets: String },

    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// On-disk layout of config.toml
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    llm: EngineConfig,
}

/// Static engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// OpenAI-compatible API root
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Output token cap for single-shot analysis
    pub analysis_max_tokens: u32,
    /// Output token cap for chat replies
    pub chat_max_tokens: u32,
    /// Most recent turns forwarded per chat request
    pub history_window: usize,
    pub preset: PromptPreset,
    /// Whole-request timeout for non-streamed calls; also caps the connect
    /// timeout. Streamed replies run until the service ends them.
    pub timeout_secs: u64,
    /// Name of the key looked up in secrets.toml and the environment
    pub api_key_env: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            analysis_max_tokens: 2000,
            chat_max_tokens: 1500,
            history_window: DEFAULT_HISTORY_WINDOW,
            preset: PromptPreset::Detailed,
            timeout_secs: 60,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl EngineConfig {
    /// Load `<config_dir>/config.toml`, falling back to defaults when absent
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse { path, message },
            other => other,
        })
    }

    /// Parse and validate config text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::from(CONFIG_FILE),
            message: e.to_string(),
        })?;
        file.llm.validate()?;
        Ok(file.llm)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url is empty".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model is empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature must be within 0..=2, got {}",
                self.temperature
            )));
        }
        if self.analysis_max_tokens == 0 || self.chat_max_tokens == 0 {
            return Err(ConfigError::Invalid(
                "max token limits must be positive".to_string(),
            ));
        }
        if self.history_window == 0 {
            return Err(ConfigError::Invalid(
                "history_window must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.api_key_env.trim().is_empty() {
            return Err(ConfigError::Invalid("api_key_env is empty".to_string()));
        }
        Ok(())
    }
}
