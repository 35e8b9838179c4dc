use sift_llm::{Content, Message, ToolCall};

/// Mutable state of one session run: the model in use and the growing
/// message log. Messages are append-only; sent messages are never edited.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub run_id: String,
    pub model: String,
    pub messages: Vec<Message>,
}

impl SessionState {
    pub fn new(run_id: String, model: String, messages: Vec<Message>) -> Self {
        Self {
            run_id,
            model,
            messages,
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Tool calls awaiting execution on the latest assistant message
    pub fn pending_tool_calls(&self) -> Vec<ToolCall> {
        self.last_message()
            .and_then(|msg| msg.tool_calls())
            .map(|calls| calls.to_vec())
            .unwrap_or_default()
    }

    pub fn add_tool_result(&mut self, tool_call_id: String, result: String) {
        self.messages.push(Message::Tool {
            tool_call_id,
            content: Content::text(result),
        });
    }
}
