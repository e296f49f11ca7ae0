//! Narrator configuration.

use crate::llm_client::{DEFAULT_API_URL, LlmConfig};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Value shipped in `.env.example`; treated the same as no key at all.
const PLACEHOLDER_KEY: &str = "your_openrouter_api_key_here";

/// Settings for the narrative model. Every field has a default.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct NarratorConfig {
    /// Chat completion endpoint.
    api_url: String,

    /// Model identifier.
    model: String,

    /// Maximum tokens for the model's answer.
    max_tokens: u32,

    /// Sampling temperature.
    temperature: f32,

    /// Hard upper bound on the upstream call, in seconds.
    timeout_secs: u64,

    /// `HTTP-Referer` header sent for attribution.
    referer: String,

    /// `X-Title` header sent for attribution.
    title: String,

    /// Environment variable holding the API key.
    api_key_env: String,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: "deepseek/deepseek-r1:free".to_string(),
            max_tokens: 700,
            temperature: 0.9,
            timeout_secs: 45,
            referer: "http://localhost:3000".to_string(),
            title: "Zyro Grid Battle".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
        }
    }
}

impl NarratorConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(model = %config.model, "Config loaded successfully");
        Ok(config)
    }

    /// Loads from `path` when given, defaults otherwise.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Points the narrator at another endpoint.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Overrides the upstream time budget.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Overrides the environment variable the key is read from.
    pub fn with_api_key_env(mut self, api_key_env: impl Into<String>) -> Self {
        self.api_key_env = api_key_env.into();
        self
    }

    /// Upstream time budget.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Builds the LLM client config from the environment.
    ///
    /// A missing, blank or placeholder key yields `None`; the gateway then
    /// narrates every turn offline.
    #[instrument(skip(self), fields(api_key_env = %self.api_key_env))]
    pub fn llm_config(&self) -> Option<LlmConfig> {
        let key = std::env::var(&self.api_key_env).ok()?;
        self.llm_config_with_key(&key)
    }

    /// Builds the LLM client config from an explicit key.
    pub fn llm_config_with_key(&self, key: &str) -> Option<LlmConfig> {
        let key = key.trim();
        if key.is_empty() || key == PLACEHOLDER_KEY {
            info!("API key not configured, model narration disabled");
            return None;
        }

        Some(
            LlmConfig::new(
                key.to_string(),
                self.model.clone(),
                self.max_tokens,
                self.timeout(),
            )
            .with_api_url(self.api_url.clone())
            .with_temperature(self.temperature)
            .with_attribution(self.referer.clone(), self.title.clone()),
        )
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
