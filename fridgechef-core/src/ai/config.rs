//! AI configuration from environment variables.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default OpenRouter base URL.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model to use. Must accept image input.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const MODEL_VAR: &str = "FRIDGECHEF_AI_MODEL";
pub const BASE_URL_VAR: &str = "FRIDGECHEF_AI_BASE_URL";
pub const TIMEOUT_VAR: &str = "FRIDGECHEF_AI_TIMEOUT_SECS";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: String, value: String },
}

/// AI client configuration.
#[derive(Clone)]
pub struct AiConfig {
    /// API key for the inference endpoint.
    pub api_key: String,
    /// Model name (e.g., "google/gemini-2.5-flash", "openai/gpt-4o-mini").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

// Hand-written so the key never ends up in logs.
impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AiConfig {
    /// Create a configuration with default model, base URL and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `OPENROUTER_API_KEY`: API key for OpenRouter
    ///
    /// Optional:
    /// - `FRIDGECHEF_AI_MODEL`: Model name (default: "google/gemini-2.5-flash")
    /// - `FRIDGECHEF_AI_BASE_URL`: API base URL (default: "https://openrouter.ai/api/v1")
    /// - `FRIDGECHEF_AI_TIMEOUT_SECS`: Request timeout (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(API_KEY_VAR.to_string()))?;

        let mut config = Self::new(api_key.trim());

        if let Some(model) = lookup(MODEL_VAR).filter(|v| !v.is_empty()) {
            config.model = model;
        }

        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|v| !v.is_empty()) {
            config.base_url = base_url;
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs: u64 = raw
                .trim()
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    var: TIMEOUT_VAR.to_string(),
                    value: raw.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
