use std::time::Duration;

use axum::http::HeaderValue;
use serde::Serialize;
use thiserror::Error;

const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:3000";
/// Upper bound on `LLM_MAX_RETRIES`; backoff doubles per attempt.
const MAX_LLM_ATTEMPTS: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No model provider credential set: define OPENAI_API_KEY or ANTHROPIC_API_KEY")]
    MissingCredential,

    #[error("Both OPENAI_API_KEY and ANTHROPIC_API_KEY are set; exactly one provider may be configured")]
    AmbiguousCredential,

    #[error("Invalid value for '{key}': {message}")]
    Invalid { key: &'static str, message: String },
}

/// Which upstream text-generation API the `LlmClient` talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    OpenAi,
    Anthropic,
}

impl LlmProvider {
    pub fn default_model(self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "gpt-4o",
            LlmProvider::Anthropic => "claude-sonnet-4-5",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "https://api.openai.com/v1",
            LlmProvider::Anthropic => "https://api.anthropic.com",
        }
    }
}

/// Everything the generation client needs. Read-only after startup.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub timeout: Duration,
    /// Total attempts per call, including the first one.
    pub max_retries: u32,
}

/// Application configuration loaded from environment variables.
/// Startup fails if no model credential is present.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub frontend_origin: HeaderValue,
    pub port: u16,
    pub request_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let (provider, api_key) = match (non_blank("OPENAI_API_KEY"), non_blank("ANTHROPIC_API_KEY")) {
            (Some(key), None) => (LlmProvider::OpenAi, key),
            (None, Some(key)) => (LlmProvider::Anthropic, key),
            (Some(_), Some(_)) => return Err(ConfigError::AmbiguousCredential),
            (None, None) => return Err(ConfigError::MissingCredential),
        };

        let model = non_blank("LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string());
        let base_url = non_blank("LLM_BASE_URL")
            .unwrap_or_else(|| provider.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string();

        let max_retries: u32 = parse_or("LLM_MAX_RETRIES", non_blank("LLM_MAX_RETRIES"), 3)?;
        if !(1..=MAX_LLM_ATTEMPTS).contains(&max_retries) {
            return Err(ConfigError::Invalid {
                key: "LLM_MAX_RETRIES",
                message: format!("must be between 1 and {MAX_LLM_ATTEMPTS}"),
            });
        }

        let origin = non_blank("FRONTEND_ORIGIN").unwrap_or_else(|| DEFAULT_FRONTEND_ORIGIN.to_string());
        let frontend_origin = HeaderValue::from_str(origin.trim()).map_err(|e| ConfigError::Invalid {
            key: "FRONTEND_ORIGIN",
            message: e.to_string(),
        })?;

        Ok(Config {
            llm: LlmConfig {
                provider,
                api_key,
                model,
                base_url,
                max_tokens: parse_or("LLM_MAX_TOKENS", non_blank("LLM_MAX_TOKENS"), 4096)?,
                timeout: Duration::from_secs(parse_or(
                    "LLM_TIMEOUT_SECS",
                    non_blank("LLM_TIMEOUT_SECS"),
                    120,
                )?),
                max_retries,
            },
            frontend_origin,
            port: parse_or("PORT", non_blank("PORT"), 8080)?,
            request_timeout: Duration::from_secs(parse_or(
                "REQUEST_TIMEOUT_SECS",
                non_blank("REQUEST_TIMEOUT_SECS"),
                300,
            )?),
            rust_log: non_blank("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}
