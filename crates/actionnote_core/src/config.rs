//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve database, logging and chat-model settings from `ACTIONNOTE_*`
//!   environment variables.
//! - Apply defaults for every unset value.
//!
//! # Invariants
//! - Parsing is pure over a lookup function; only `from_env` touches the
//!   process environment.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "ACTIONNOTE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "ACTIONNOTE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "ACTIONNOTE_LOG_DIR";
pub const ENV_OLLAMA_URL: &str = "ACTIONNOTE_OLLAMA_URL";
pub const ENV_LLM_MODEL: &str = "ACTIONNOTE_LLM_MODEL";
pub const ENV_LLM_TIMEOUT_SECS: &str = "ACTIONNOTE_LLM_TIMEOUT_SECS";

const DEFAULT_DB_PATH: &str = "actionnote.db";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_LLM_MODEL: &str = "llama3.2";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Configuration error with the offending variable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "invalid value `{value}` for {key}; expected {expected}"),
        }
    }
}

impl Error for ConfigError {}

/// Chat-model connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        }
    }
}

/// Process-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Log level passed to `init_logging`.
    pub log_level: String,
    /// Log directory. File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub llm: LlmConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: default_log_level().to_string(),
            log_dir: None,
            llm: LlmConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = get(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = get(ENV_LOG_DIR).map(PathBuf::from);
        if let Some(url) = get(ENV_OLLAMA_URL) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    key: ENV_OLLAMA_URL,
                    value: url,
                    expected: "an http:// or https:// URL",
                });
            }
            config.llm.base_url = url;
        }
        if let Some(model) = get(ENV_LLM_MODEL) {
            config.llm.model = model;
        }
        if let Some(raw) = get(ENV_LLM_TIMEOUT_SECS) {
            config.llm.timeout_secs = match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_LLM_TIMEOUT_SECS,
                        value: raw,
                        expected: "a positive number of seconds",
                    })
                }
            };
        }

        Ok(config)
    }
}
