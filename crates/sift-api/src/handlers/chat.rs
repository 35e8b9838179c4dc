use axum::{
    extract::State,
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::{self, Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;

use sift_agent::{
    augment_messages, screen_attachments, PiiDetectionTool, RequestContext, ScreenedAttachments,
    Session, SessionEvent,
};
use sift_llm::{Content, ContentPart, Message as LLMMessage};

use crate::error::ApiResult;
use crate::state::AppState;
use crate::validate::{validate_request, ChatMessage, Role};

/// Send a chat turn and stream the completion using Server-Sent Events
///
/// The pipeline per request: validate the body, resolve the provider from
/// the model prefix, screen the incoming turn's attachments, inject the
/// PII system prompt when attachments are present, then run the bounded
/// tool-calling session and bridge its events to SSE.
#[utoipa::path(
    post,
    path = "/api/chat",
    responses(
        (status = 200, description = "Streaming response", content_type = "text/event-stream"),
        (status = 400, description = "Malformed request body or unknown model"),
        (status = 500, description = "Provider credential not configured")
    ),
    tag = "chat"
)]
pub async fn chat_stream(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let request = validate_request(&body, &state.config.llm.default_model)?;

    tracing::info!(
        model = %request.model,
        messages = request.messages.len(),
        "Chat request received"
    );

    // Fails closed before any upstream traffic
    let client = state.registry.resolve(&request.model)?;

    // Screen the incoming turn's attachments; rejected files are reported,
    // the accepted subset proceeds
    let last = request
        .messages
        .last()
        .expect("validated request has at least one message");
    let screened = screen_attachments(&last.attachments);
    for name in screened.rejected_names() {
        tracing::warn!(file = %name, "Rejected attachment with unsupported content type");
    }

    let scan_text = request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.clone())
        .unwrap_or_default();

    let ctx = RequestContext::new(screened.accepted.clone(), scan_text);

    let messages = to_llm_messages(&request.messages, &screened);
    let messages = augment_messages(messages, &screened.accepted);

    let session = Session::new(client, Arc::new(PiiDetectionTool::new(ctx)))
        .with_config(state.session_config.clone());
    let receiver = session.spawn_run(&request.model, messages);

    let warning = rejected_warning(&screened);
    let events = stream::iter(warning)
        .chain(ReceiverStream::new(receiver).map(to_sse_event));

    Ok(Sse::new(events))
}

/// Convert validated messages into provider messages. User turns with
/// attachments become multipart content (text + data-URL parts); the
/// latest turn uses its screened subset.
fn to_llm_messages(messages: &[ChatMessage], screened: &ScreenedAttachments) -> Vec<LLMMessage> {
    let last_index = messages.len().saturating_sub(1);

    messages
        .iter()
        .enumerate()
        .map(|(index, message)| match message.role {
            Role::System => LLMMessage::system(message.content.clone()),
            Role::Assistant => LLMMessage::ai(message.content.clone()),
            Role::User => {
                let attachments = if index == last_index {
                    &screened.accepted
                } else {
                    &message.attachments
                };

                if attachments.is_empty() {
                    LLMMessage::human(message.content.clone())
                } else {
                    let mut parts = vec![ContentPart::text(message.content.clone())];
                    for attachment in attachments {
                        if attachment.is_pdf() {
                            parts.push(ContentPart::file(
                                attachment.pathname.clone(),
                                attachment.url.clone(),
                            ));
                        } else {
                            parts.push(ContentPart::image_url(attachment.url.clone()));
                        }
                    }
                    LLMMessage::Human {
                        content: Content::Parts(parts),
                    }
                }
            }
        })
        .collect()
}

fn rejected_warning(screened: &ScreenedAttachments) -> Option<Result<Event, Infallible>> {
    if screened.rejected.is_empty() {
        return None;
    }

    let event = Event::default()
        .event("warning")
        .json_data(serde_json::json!({
            "message": "Some attachments were rejected; only images and PDF files are supported",
            "rejected": screened.rejected_names(),
        }))
        .unwrap();

    Some(Ok(event))
}

fn to_sse_event(event: SessionEvent) -> Result<Event, Infallible> {
    let sse_event = match event {
        SessionEvent::Message { content } => Event::default()
            .event("message")
            .json_data(serde_json::json!({
                "content": content
            })),
        SessionEvent::ToolCall {
            index,
            id,
            name,
            arguments,
        } => Event::default()
            .event("tool_call")
            .json_data(serde_json::json!({
                "index": index,
                "id": id,
                "name": name,
                "arguments": arguments
            })),
        SessionEvent::ToolResult {
            tool_call_id,
            result,
            is_error,
            ..
        } => Event::default()
            .event("tool_result")
            .json_data(serde_json::json!({
                "tool_call_id": tool_call_id,
                "result": result,
                "is_error": is_error
            })),
        SessionEvent::Step {
            step,
            finish_reason,
            usage,
        } => Event::default()
            .event("step")
            .json_data(serde_json::json!({
                "step": step,
                "finish_reason": finish_reason,
                "usage": usage
            })),
        SessionEvent::Done { finish_reason } => Event::default()
            .event("done")
            .json_data(serde_json::json!({
                "status": "completed",
                "finish_reason": finish_reason
            })),
        SessionEvent::Error { message } => Event::default()
            .event("error")
            .json_data(serde_json::json!({
                "error": message
            })),
        // InitStream / EndStream bookkeeping
        other => Event::default()
            .event("info")
            .json_data(serde_json::to_value(&other).unwrap_or_default()),
    };

    Ok(sse_event.unwrap())
}
