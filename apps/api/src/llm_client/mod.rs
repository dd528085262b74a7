//! LLM Client: the single point of entry for all text-generation calls.
//!
//! ARCHITECTURAL RULE: No other module may call a model provider directly.
//! Everything else depends on the `TextGenerator` trait, and `LlmClient` is the
//! only production implementation of it.
//!
//! Provider (OpenAI or Anthropic), model and credentials come from `LlmConfig`,
//! resolved once at startup.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{LlmConfig, LlmProvider};

mod anthropic;
#[cfg(test)]
pub mod fake;
mod openai;
pub mod prompts;

/// First retry waits this long; every further retry doubles it.
const RETRY_BASE_DELAY_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// A short description that is safe to show to API callers.
    /// Never includes upstream response bodies or credentials.
    pub fn public_message(&self) -> &'static str {
        match self {
            LlmError::Http(_) => "the model provider could not be reached",
            LlmError::Api { status: 429, .. } | LlmError::RateLimited { .. } => {
                "the model provider is rate limiting requests"
            }
            LlmError::Api { .. } => "the model provider rejected the request",
            LlmError::Parse(_) => "the model provider returned an unreadable response",
            LlmError::EmptyContent => "the model returned an empty response",
        }
    }
}

/// The one capability the rest of the service needs from a generative model.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>` so tests can swap in a fake.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends `prompt` (with `system` instructions) and returns the raw text answer.
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

/// Token counts reported by the provider, normalised across wire formats.
#[derive(Debug, Default, Clone, Copy)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Provider response reduced to what callers need.
#[derive(Debug)]
pub struct LlmResponse {
    pub text: Option<String>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// HTTP client for the configured model provider, with retry and timeout.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn provider(&self) -> LlmProvider {
        self.config.provider
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_request(&self, prompt: &str, system: &str) -> RequestBuilder {
        match self.config.provider {
            LlmProvider::OpenAi => openai::build_request(&self.client, &self.config, prompt, system),
            LlmProvider::Anthropic => {
                anthropic::build_request(&self.client, &self.config, prompt, system)
            }
        }
    }

    async fn parse_response(&self, response: reqwest::Response) -> Result<LlmResponse, LlmError> {
        match self.config.provider {
            LlmProvider::OpenAi => openai::parse_response(response).await,
            LlmProvider::Anthropic => anthropic::parse_response(response).await,
        }
    }

    /// Makes a raw call to the provider, returning the normalised response.
    /// Retries on transport errors, 429 (rate limit) and 5xx with exponential backoff.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let attempts = self.config.max_retries;
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = backoff_delay(attempt);
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.build_request(prompt, system).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                // Both providers wrap errors as {"error": {"message": ...}}
                let message = serde_json::from_str::<ProviderError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response = self.parse_response(response).await?;

            debug!(
                "LLM call succeeded: model={}, input_tokens={}, output_tokens={}",
                self.config.model, llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(match last_error {
            Some(LlmError::Api { status: 429, .. }) | None => {
                LlmError::RateLimited { retries: attempts }
            }
            Some(e) => e,
        })
    }
}

/// Delay before retry number `attempt` (1-based), saturating instead of overflowing.
fn backoff_delay(attempt: u32) -> Duration {
    let factor = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    Duration::from_millis(RETRY_BASE_DELAY_MS.saturating_mul(factor))
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, system).await?;
        response
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

/// Strips ```lang ... ``` or ``` ... ``` code fences wrapped around model output.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. "json", "text") on the opening fence line.
    let body = match rest.find('\n') {
        Some(idx) if !rest[..idx].trim().contains(' ') => &rest[idx + 1..],
        _ => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .map(|s| s.trim())
        .unwrap_or(body.trim())
}
