use serde::{Deserialize, Serialize};
use sift_llm::TokenUsage;

/// Unified event stream for one chat session.
///
/// Includes the provider's incremental events plus the orchestration events
/// the gateway adds around them (init/step/end). This is what the HTTP
/// layer converts into SSE frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Session started
    Init { run_id: String, timestamp: i64 },

    /// Response text delta from the model
    Message { content: String },

    /// The model decided to call a tool (streamed incrementally)
    ToolCall {
        index: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        arguments: Option<String>,
    },

    /// Tool execution completed
    ToolResult {
        tool_call_id: String,
        result: String,
        is_error: bool,
        duration_ms: u64,
    },

    /// Telemetry side channel: one completion round-trip finished. Carries
    /// usage and finish reason without affecting the response content.
    Step {
        step: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        finish_reason: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        usage: Option<TokenUsage>,
    },

    /// Terminal response produced; no further model output follows
    Done {
        #[serde(skip_serializing_if = "Option::is_none")]
        finish_reason: Option<String>,
    },

    /// Fatal error; the session is over
    Error { message: String },

    /// Session finished
    End {
        status: String,
        total_duration_ms: u64,
    },
}

/// Provider stream events forward into the session stream unchanged in
/// meaning; the `Done` usage payload is telemetry and travels on `Step`
/// instead.
impl From<sift_llm::StreamEvent> for SessionEvent {
    fn from(event: sift_llm::StreamEvent) -> Self {
        match event {
            sift_llm::StreamEvent::Message { content } => Self::Message { content },
            sift_llm::StreamEvent::ToolCall {
                index,
                id,
                name,
                arguments,
            } => Self::ToolCall {
                index,
                id,
                name,
                arguments,
            },
            sift_llm::StreamEvent::Done { finish_reason, .. } => Self::Done { finish_reason },
        }
    }
}
