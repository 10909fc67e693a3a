//! Trip planner configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while turning configuration into something callable
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API key not provided. Pass --api-key or set the {env_var} environment variable.")]
    MissingCredential { env_var: String },

    #[error("Invalid model configuration: {0}")]
    InvalidModel(String),

    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },
}

/// Main trip planner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Group chat limits
    pub chat: ChatConfig,

    /// Request pipeline policy (cache, retry, timeout)
    pub planner: PlannerConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        debug!(?config_path, "Config::load: called");
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            let config =
                Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()))?;
            config
                .validate()
                .context(format!("Invalid config in {}", path.display()))?;
            return Ok(config);
        }

        for candidate in Self::search_paths() {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => {
                        // A readable but nonsensical file is an error, not a reason to fall through
                        config
                            .validate()
                            .context(format!("Invalid config in {}", candidate.display()))?;
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed: a broken config file is reported properly by
    /// [`Config::load`] once logging exists.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(path) => Some(path.clone()),
            None => Self::search_paths().into_iter().find(|p| p.exists()),
        }?;
        let content = fs::read_to_string(path).ok()?;
        let config: Self = serde_yaml::from_str(&content).ok()?;
        config.log_level
    }

    /// Project-local config first, then user config
    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".tripplanner.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("tripplanner").join("tripplanner.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject settings that would make every request fail or never reach the model
    pub fn validate(&self) -> Result<(), ConfigError> {
        debug!("Config::validate: called");
        if self.llm.timeout_ms == Some(0) {
            return Err(ConfigError::InvalidSetting {
                key: "llm.timeout-ms",
                reason: "must be positive when set".to_string(),
            });
        }
        self.chat.validate()?;
        self.planner.validate()
    }

    /// Resolve the API credential: explicit value first, then environment
    ///
    /// Empty strings count as absent.
    pub fn resolve_credential(&self, explicit: Option<&str>) -> Option<String> {
        debug!(api_key_env = %self.llm.api_key_env, explicit = explicit.is_some(), "resolve_credential: called");
        if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
            debug!("resolve_credential: using explicit credential");
            return Some(key.to_string());
        }

        match std::env::var(&self.llm.api_key_env) {
            Ok(key) if !key.trim().is_empty() => {
                debug!("resolve_credential: using environment credential");
                Some(key.trim().to_string())
            }
            _ => {
                debug!("resolve_credential: no credential found");
                None
            }
        }
    }

    /// Like [`Config::resolve_credential`], asking `ask` only when nothing else is set
    ///
    /// A blank answer still counts as absent.
    pub fn resolve_credential_or<F>(&self, explicit: Option<&str>, ask: F) -> Option<String>
    where
        F: FnOnce() -> Option<String>,
    {
        if let Some(key) = self.resolve_credential(explicit) {
            return Some(key);
        }
        debug!("resolve_credential_or: asking for credential");
        ask().map(|key| key.trim().to_string()).filter(|key| !key.is_empty())
    }

    /// Build the validated model configuration shared by every agent
    pub fn model_config(&self, explicit_key: Option<&str>) -> Result<ModelConfig, ConfigError> {
        self.model_config_or(explicit_key, || None)
    }

    /// Build the model configuration, falling back to `ask` for the credential
    pub fn model_config_or<F>(&self, explicit_key: Option<&str>, ask: F) -> Result<ModelConfig, ConfigError>
    where
        F: FnOnce() -> Option<String>,
    {
        let credential = self
            .resolve_credential_or(explicit_key, ask)
            .ok_or_else(|| ConfigError::MissingCredential {
                env_var: self.llm.api_key_env.clone(),
            })?;

        let model = ModelConfig {
            model_id: self.llm.model.clone(),
            credential,
            provider: self.llm.provider,
            max_output_tokens: self.llm.max_tokens,
        };
        model.validate()?;
        Ok(model)
    }
}

/// LLM provider tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderTag {
    #[default]
    Groq,
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderTag {
    /// Base URL of the provider's OpenAI-compatible endpoint
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Groq => "https://api.groq.com/openai",
            Self::OpenAi => "https://api.openai.com",
        }
    }
}

impl fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Groq => write!(f, "groq"),
            Self::OpenAi => write!(f, "openai"),
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("groq" or "openai")
    pub provider: ProviderTag,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL (defaults per provider)
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// HTTP request timeout in milliseconds (none by default)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: Option<u64>,
}

impl LlmConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderTag::Groq,
            model: "deepseek-r1-distill-llama-70b".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            base_url: None,
            max_tokens: 5000,
            timeout_ms: None,
        }
    }
}

/// Model settings handed opaquely to every agent in the roster
#[derive(Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub model_id: String,
    pub credential: String,
    pub provider: ProviderTag,
    pub max_output_tokens: u32,
}

impl ModelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model_id.trim().is_empty() {
            return Err(ConfigError::InvalidModel("model identifier is empty".to_string()));
        }
        if self.credential.trim().is_empty() {
            return Err(ConfigError::InvalidModel("credential is empty".to_string()));
        }
        if self.max_output_tokens == 0 {
            return Err(ConfigError::InvalidModel("max output tokens must be positive".to_string()));
        }
        Ok(())
    }
}

// Keep the credential out of logs
impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("model_id", &self.model_id)
            .field("credential", &"<redacted>")
            .field("provider", &self.provider)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

/// Group chat limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum number of messages in one group chat, including the opening prompt
    #[serde(rename = "max-round")]
    pub max_round: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { max_round: 6 }
    }
}

impl ChatConfig {
    /// The opening prompt takes one slot; at least one agent must get a turn
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_round < 2 {
            return Err(ConfigError::InvalidSetting {
                key: "chat.max-round",
                reason: format!("must be at least 2, got {}", self.max_round),
            });
        }
        Ok(())
    }
}

/// Request pipeline policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Number of rendered prompts remembered
    #[serde(rename = "cache-capacity")]
    pub cache_capacity: usize,

    /// Attempts before a rate-limited request gives up
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Backoff unit in milliseconds; attempt n sleeps unit * 2^n
    #[serde(rename = "backoff-ms")]
    pub backoff_ms: u64,

    /// Sleep at least as long as the provider's retry-after hint
    #[serde(rename = "respect-retry-after")]
    pub respect_retry_after: bool,

    /// Give up on a request after this many seconds (none by default)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 10,
            max_attempts: 5,
            backoff_ms: 1000,
            respect_retry_after: false,
            timeout_secs: None,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidSetting {
                key: "planner.max-attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidSetting {
                key: "planner.timeout-secs",
                reason: "must be positive when set".to_string(),
            });
        }
        Ok(())
    }
}
