// OpenAI-specific client implementation

use crate::streaming::{parse_chat_sse_stream, ChunkUsage};
use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, EventStream, TokenUsage};
use crate::types::{Message, ToolCall};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI client (HTTP direct, no SDK)
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let http_client = build_bearer_client(&api_key.into())?;

        Ok(Self {
            http_client,
            base_url: OPENAI_API_BASE.to_string(),
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
            anyhow::bail!("OpenAI API error ({}): {}", status, error_text);
        }

        Ok(response)
    }
}

/// Shared constructor for bearer-authenticated JSON clients; the Gemini
/// compatibility endpoint uses the same scheme.
pub(crate) fn build_bearer_client(api_key: &str) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", api_key)).context("Invalid API key format")?,
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .context("Failed to create HTTP client")
}

/// Assemble a chat-completions payload.
///
/// `Message` and the option types serialize directly into wire shape, so
/// this only layers the optional fields on top.
pub(crate) fn build_chat_payload(
    model: &str,
    messages: &[Message],
    options: &ChatOptions,
    stream: bool,
) -> Result<Value> {
    let mut request = serde_json::json!({
        "model": model,
        "messages": serde_json::to_value(messages)?,
        "stream": stream,
    });

    let obj = request
        .as_object_mut()
        .expect("payload is always a JSON object");

    if stream {
        // Ask for the trailing usage chunk so step telemetry gets totals
        obj.insert(
            "stream_options".to_string(),
            serde_json::json!({ "include_usage": true }),
        );
    }
    if let Some(temp) = options.temperature {
        obj.insert("temperature".to_string(), serde_json::json!(temp));
    }
    if let Some(max_tokens) = options.max_tokens {
        obj.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
    }
    if let Some(tools) = &options.tools {
        obj.insert("tools".to_string(), serde_json::to_value(tools)?);
    }
    if let Some(tool_choice) = &options.tool_choice {
        obj.insert("tool_choice".to_string(), serde_json::to_value(tool_choice)?);
    }

    Ok(request)
}

#[async_trait]
impl ChatClient for OpenAIClient {
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

// ============================================================================
// WIRE TYPES (non-streaming chat completions)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ChatCompletion {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<ChunkUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Choice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ResponseMessage {
    pub role: String,
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl ChatCompletion {
    pub(crate) fn into_response(self) -> Result<ChatResponse> {
        let raw = serde_json::to_value(&self)?;
        let choice = self.choices.into_iter().next();

        Ok(ChatResponse {
            content: choice.as_ref().and_then(|c| c.message.content.clone()),
            tool_calls: choice.as_ref().and_then(|c| c.message.tool_calls.clone()),
            usage: self.usage.map(TokenUsage::from),
            finish_reason: choice.and_then(|c| c.finish_reason),
            raw,
        })
    }
}
