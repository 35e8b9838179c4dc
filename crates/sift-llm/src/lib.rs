pub mod types;
pub mod traits;
pub mod streaming;
pub mod openai;
pub mod google;

pub use traits::{
    ChatClient,
    ChatRequest, ChatResponse, ChatOptions,
    TokenUsage,
};

pub use streaming::StreamEvent;
pub use openai::OpenAIClient;
pub use google::GoogleClient;
pub use types::{Message, Content, ContentPart, Tool, ToolCall, ToolChoice};
