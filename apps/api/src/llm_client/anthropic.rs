//! Anthropic Messages API wire format.

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use super::{LlmError, LlmResponse, Usage};
use crate::config::LlmConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<MessagesUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagesUsage {
    input_tokens: u32,
    output_tokens: u32,
}

pub(super) fn build_request(
    client: &Client,
    config: &LlmConfig,
    prompt: &str,
    system: &str,
) -> RequestBuilder {
    let body = MessagesRequest {
        model: &config.model,
        max_tokens: config.max_tokens,
        system,
        messages: vec![Message {
            role: "user",
            content: prompt,
        }],
    };

    client
        .post(format!("{}/v1/messages", config.base_url))
        .header("x-api-key", &config.api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .json(&body)
}

pub(super) async fn parse_response(response: reqwest::Response) -> Result<LlmResponse, LlmError> {
    let body = response.text().await?;
    let messages: MessagesResponse = serde_json::from_str(&body)?;

    // Only the first text block is used.
    let text = messages
        .content
        .into_iter()
        .find(|b| b.block_type == "text")
        .and_then(|b| b.text);

    let usage = messages
        .usage
        .map(|u| Usage {
            input_tokens: u.input_tokens,
            output_tokens: u.output_tokens,
        })
        .unwrap_or_default();

    Ok(LlmResponse { text, usage })
}
