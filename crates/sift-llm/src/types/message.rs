use serde::{Deserialize, Serialize};

use super::content::Content;
use super::tool::ToolCall;

/// Chat message in provider wire shape.
///
/// The serde representation matches the OpenAI chat-completions message
/// format, which the Gemini OpenAI-compatibility endpoint also accepts, so
/// a `Vec<Message>` serializes straight into a request payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// Instructions injected ahead of the conversation
    System { content: Content },

    /// End-user turn
    #[serde(rename = "user")]
    Human { content: Content },

    /// Model turn; carries tool calls when the model decided to invoke one
    #[serde(rename = "assistant")]
    AI {
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<Content>,

        #[serde(skip_serializing_if = "Option::is_none")]
        tool_calls: Option<Vec<ToolCall>>,
    },

    /// Result of a tool invocation, fed back into the model
    Tool {
        tool_call_id: String,
        content: Content,
    },
}

impl Message {
    pub fn system(content: impl Into<Content>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<Content>) -> Self {
        Self::Human {
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<Content>) -> Self {
        Self::AI {
            content: Some(content.into()),
            tool_calls: None,
        }
    }

    pub fn ai_with_tools(content: Option<Content>, tool_calls: Vec<ToolCall>) -> Self {
        Self::AI {
            content,
            tool_calls: Some(tool_calls),
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<Content>) -> Self {
        Self::Tool {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }

    pub fn role(&self) -> &str {
        match self {
            Self::System { .. } => "system",
            Self::Human { .. } => "user",
            Self::AI { .. } => "assistant",
            Self::Tool { .. } => "tool",
        }
    }

    /// Tool calls pending on this message, if it is an assistant turn
    pub fn tool_calls(&self) -> Option<&[ToolCall]> {
        match self {
            Self::AI {
                tool_calls: Some(calls),
                ..
            } => Some(calls),
            _ => None,
        }
    }
}
