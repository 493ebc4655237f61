//! OpenAI Chat Completions API client.
//!
//! Thin HTTP wrapper for `/chat/completions` against the configured base
//! URL, which also covers OpenAI-compatible gateways. Pure parsing in
//! `parse_response` for testability.

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;

use std::time::Duration;

use super::config::LlmTimeouts;
use super::types::{ChatResponse, Content, ContentBlock, LlmError, Message};

// =============================================================================
// CLIENT
// =============================================================================

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Build the client with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] when the HTTP client cannot
    /// be constructed.
    pub fn new(api_key: String, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url })
    }

    /// Send one chat request.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] on transport failure, non-200 status, or a
    /// malformed body.
    pub async fn chat(
        &self,
        model: &str,
        max_tokens: u32,
        system: &str,
        messages: &[Message],
    ) -> Result<ChatResponse, LlmError> {
        let body = build_request(model, max_tokens, system, messages);

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }

        parse_response(&text)
    }
}

// =============================================================================
// REQUEST / RESPONSE MAPPING
// =============================================================================

/// Flatten message content to the plain string the chat-completions API
/// expects.
fn content_to_text(content: &Content) -> String {
    match content {
        Content::Text(text) => text.clone(),
        Content::Blocks(blocks) => blocks
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn build_request(model: &str, max_tokens: u32, system: &str, messages: &[Message]) -> serde_json::Value {
    let mut wire_messages = vec![serde_json::json!({ "role": "system", "content": system })];
    wire_messages.extend(messages.iter().map(|m| {
        serde_json::json!({ "role": m.role, "content": content_to_text(&m.content) })
    }));

    serde_json::json!({
        "model": model,
        "max_tokens": max_tokens,
        "messages": wire_messages,
    })
}

#[derive(serde::Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
    model: String,
    usage: Usage,
}

#[derive(serde::Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(serde::Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(serde::Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

fn parse_response(json: &str) -> Result<ChatResponse, LlmError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let choice = api
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::ApiParse("no choices in response".to_owned()))?;

    let content = choice
        .message
        .content
        .map(|text| vec![ContentBlock::Text { text }])
        .unwrap_or_default();

    Ok(ChatResponse {
        content,
        model: api.model,
        stop_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_owned()),
        input_tokens: api.usage.prompt_tokens,
        output_tokens: api.usage.completion_tokens,
    })
}
