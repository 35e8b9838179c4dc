// Google Gemini-specific client implementation

use crate::openai::client::{build_bearer_client, build_chat_payload, ChatCompletion};
use crate::streaming::parse_chat_sse_stream;
use crate::traits::{ChatClient, ChatRequest, ChatResponse, EventStream};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Google Gemini client (HTTP direct, no SDK)
///
/// Talks to Google's OpenAI-compatibility endpoint, which accepts the same
/// chat-completions wire format (messages, tools, SSE chunks) as OpenAI:
/// - URL: https://generativelanguage.googleapis.com/v1beta/openai/chat/completions
/// - Auth: Authorization: Bearer with the Gemini API key
pub struct GoogleClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GoogleClient {
    /// Create new client with Gemini API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let http_client = build_bearer_client(&api_key.into())?;

        Ok(Self {
            http_client,
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Point the client at a different chat-completions base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn post_chat(&self, payload: &Value) -> Result<reqwest::Response> {
        tracing::debug!(base_url = %self.base_url, "Sending chat completion request");

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({}): {}", status, error_text);
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatClient for GoogleClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = build_chat_payload(&request.model, &request.messages, &request.options, false)?;

        let response = self.post_chat(&payload).await?;

        let raw: ChatCompletion = response.json().await.context("Failed to parse response")?;

        raw.into_response()
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<EventStream> {
        let payload = build_chat_payload(&request.model, &request.messages, &request.options, true)?;

        let response = self.post_chat(&payload).await?;

        Ok(parse_chat_sse_stream(response))
    }
}
