use crate::config::SessionConfig;
use crate::events::SessionEvent;
use crate::state::SessionState;
use crate::tool::ToolExecutor;
use anyhow::Result;
use futures::StreamExt;
use sift_llm::{
    ChatClient, ChatOptions, ChatRequest, Content, Message, StreamEvent, TokenUsage, Tool,
    ToolCall, ToolChoice,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// One chat request's streaming orchestration.
///
/// Drives a bounded multi-step tool-calling conversation against the
/// dispatched provider client and exposes the run as an event stream. A
/// session is built per request and owns everything it needs (client, tool
/// executor with its request context, config), so concurrent requests
/// share nothing mutable.
pub struct Session {
    client: Arc<dyn ChatClient>,
    tools: Arc<dyn ToolExecutor>,
    config: SessionConfig,
}

impl Session {
    pub fn new(client: Arc<dyn ChatClient>, tools: Arc<dyn ToolExecutor>) -> Self {
        Self {
            client,
            tools,
            config: SessionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Spawn execution in background, return event receiver.
    ///
    /// Dropping the receiver cancels the run: the next event send fails and
    /// the loop unwinds, which is how client disconnects are handled.
    pub fn spawn_run(&self, model: impl Into<String>, messages: Vec<Message>) -> mpsc::Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel(1000);

        let client = Arc::clone(&self.client);
        let tools = Arc::clone(&self.tools);
        let config = self.config.clone();
        let model = model.into();

        tokio::spawn(async move {
            let timeout = config.execution_timeout;
            let run = Self::execute_loop(client, tools, config, model, messages, tx.clone());

            match tokio::time::timeout(timeout, run).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    let _ = tx
                        .send(SessionEvent::Error {
                            message: e.to_string(),
                        })
                        .await;
                }
                Err(_) => {
                    let _ = tx
                        .send(SessionEvent::Error {
                            message: format!(
                                "Session timed out after {}s",
                                timeout.as_secs()
                            ),
                        })
                        .await;
                }
            }
        });

        rx
    }

    async fn execute_loop(
        client: Arc<dyn ChatClient>,
        tools: Arc<dyn ToolExecutor>,
        config: SessionConfig,
        model: String,
        messages: Vec<Message>,
        event_tx: mpsc::Sender<SessionEvent>,
    ) -> Result<()> {
        let start_time = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();

        event_tx
            .send(SessionEvent::Init {
                run_id: run_id.clone(),
                timestamp: chrono::Utc::now().timestamp_millis(),
            })
            .await?;

        let mut state = SessionState::new(run_id, model, messages);
        let definitions = tools.definitions();
        let mut completed = false;

        for step in 0..config.max_steps {
            let outcome =
                Self::run_step(client.as_ref(), &state, &definitions, &config, &event_tx).await?;

            tracing::info!(
                step,
                finish_reason = ?outcome.finish_reason,
                usage = ?outcome.usage,
                tool_calls = outcome.tool_calls.len(),
                "Step finished"
            );

            event_tx
                .send(SessionEvent::Step {
                    step,
                    finish_reason: outcome.finish_reason.clone(),
                    usage: outcome.usage.clone(),
                })
                .await?;

            let content = if outcome.content.is_empty() {
                None
            } else {
                Some(Content::Text(outcome.content))
            };

            if outcome.tool_calls.is_empty() {
                // Terminal response
                if content.is_some() {
                    state.add_message(Message::AI {
                        content,
                        tool_calls: None,
                    });
                }
                event_tx
                    .send(SessionEvent::Done {
                        finish_reason: outcome.finish_reason,
                    })
                    .await?;
                completed = true;
                break;
            }

            state.add_message(Message::ai_with_tools(content, outcome.tool_calls));

            for tool_call in state.pending_tool_calls() {
                Self::run_tool(tools.as_ref(), &mut state, tool_call, &event_tx).await?;
            }
        }

        if !completed {
            event_tx
                .send(SessionEvent::Error {
                    message: format!(
                        "Maximum of {} steps reached without a final response",
                        config.max_steps
                    ),
                })
                .await?;
        }

        event_tx
            .send(SessionEvent::End {
                status: if completed { "success" } else { "incomplete" }.to_string(),
                total_duration_ms: start_time.elapsed().as_millis() as u64,
            })
            .await?;

        Ok(())
    }

    /// One completion round-trip: stream the response, forward deltas, and
    /// reassemble any tool calls from their indexed fragments.
    async fn run_step(
        client: &dyn ChatClient,
        state: &SessionState,
        definitions: &[Tool],
        config: &SessionConfig,
        event_tx: &mpsc::Sender<SessionEvent>,
    ) -> Result<StepOutcome> {
        let mut options = ChatOptions::new();
        if !definitions.is_empty() {
            options = options
                .tools(definitions.to_vec())
                .tool_choice(ToolChoice::auto());
        }
        if let Some(temperature) = config.temperature {
            options = options.temperature(temperature);
        }
        if let Some(max_tokens) = config.max_tokens {
            options = options.max_tokens(max_tokens);
        }

        let request =
            ChatRequest::new(state.model.clone(), state.messages.clone()).with_options(options);

        let mut stream = client.chat_stream(request).await?;

        let mut outcome = StepOutcome::default();
        let mut buffers: HashMap<u32, ToolCallBuffer> = HashMap::new();

        while let Some(event_result) = stream.next().await {
            match event_result? {
                StreamEvent::Message { content } => {
                    outcome.content.push_str(&content);
                    event_tx.send(SessionEvent::Message { content }).await?;
                }
                StreamEvent::ToolCall {
                    index,
                    id,
                    name,
                    arguments,
                } => {
                    let buffer = buffers.entry(index).or_default();
                    if let Some(id) = &id {
                        buffer.id = Some(id.clone());
                    }
                    if let Some(name) = &name {
                        buffer.name = Some(name.clone());
                    }
                    if let Some(arguments) = &arguments {
                        buffer.arguments.push_str(arguments);
                    }

                    event_tx
                        .send(SessionEvent::ToolCall {
                            index,
                            id,
                            name,
                            arguments,
                        })
                        .await?;
                }
                // Providers split finish reason and usage across trailing
                // chunks; keep the last seen value of each. The session-level
                // Done event is emitted by the loop, not forwarded from here.
                StreamEvent::Done {
                    finish_reason,
                    usage,
                } => {
                    if finish_reason.is_some() {
                        outcome.finish_reason = finish_reason;
                    }
                    if usage.is_some() {
                        outcome.usage = usage;
                    }
                }
            }
        }

        let mut indexed: Vec<(u32, ToolCallBuffer)> = buffers.into_iter().collect();
        indexed.sort_by_key(|(index, _)| *index);

        outcome.tool_calls = indexed
            .into_iter()
            .filter_map(|(_, buffer)| match (buffer.id, buffer.name) {
                (Some(id), Some(name)) => Some(ToolCall::new(id, name, buffer.arguments)),
                _ => None,
            })
            .collect();

        Ok(outcome)
    }

    /// Execute one tool call, resiliently: failures become error results the
    /// model can see, never a dead session.
    async fn run_tool(
        tools: &dyn ToolExecutor,
        state: &mut SessionState,
        tool_call: ToolCall,
        event_tx: &mpsc::Sender<SessionEvent>,
    ) -> Result<()> {
        let start = Instant::now();

        let (result, is_error) = match tools
            .execute(&tool_call.function.name, &tool_call.function.arguments)
            .await
        {
            Ok(result) => (result, false),
            Err(e) => (format!("Tool execution failed: {}", e), true),
        };

        event_tx
            .send(SessionEvent::ToolResult {
                tool_call_id: tool_call.id.clone(),
                result: result.clone(),
                is_error,
                duration_ms: start.elapsed().as_millis() as u64,
            })
            .await?;

        state.add_tool_result(tool_call.id, result);
        Ok(())
    }
}

#[derive(Default)]
struct StepOutcome {
    content: String,
    tool_calls: Vec<ToolCall>,
    finish_reason: Option<String>,
    usage: Option<TokenUsage>,
}

#[derive(Default)]
struct ToolCallBuffer {
    id: Option<String>,
    name: Option<String>,
    arguments: String,
}
