//! OpenAI Chat Completions wire format.

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use super::{LlmError, LlmResponse, Usage};
use crate::config::LlmConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

pub(super) fn build_request(
    client: &Client,
    config: &LlmConfig,
    prompt: &str,
    system: &str,
) -> RequestBuilder {
    let body = ChatRequest {
        model: &config.model,
        max_tokens: config.max_tokens,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ],
    };

    client
        .post(format!("{}/chat/completions", config.base_url))
        .bearer_auth(&config.api_key)
        .json(&body)
}

pub(super) async fn parse_response(response: reqwest::Response) -> Result<LlmResponse, LlmError> {
    let body = response.text().await?;
    let chat: ChatResponse = serde_json::from_str(&body)?;

    let text = chat
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content);

    let usage = chat
        .usage
        .map(|u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    Ok(LlmResponse { text, usage })
}
