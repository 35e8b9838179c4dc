use sift_llm::streaming::{ChatStreamChunk, StreamEvent};
use sift_llm::TokenUsage;

fn parse_chunk(data: &str) -> ChatStreamChunk {
    serde_json::from_str(data).unwrap()
}

#[test]
fn test_content_delta_becomes_message_event() {
    let chunk = parse_chunk(
        r#"{"choices":[{"index":0,"delta":{"role":"assistant","content":"Hel"},"finish_reason":null}]}"#,
    );

    let events = chunk.events();
    assert_eq!(
        events,
        vec![StreamEvent::Message {
            content: "Hel".to_string()
        }]
    );
}

#[test]
fn test_empty_content_delta_is_skipped() {
    let chunk = parse_chunk(
        r#"{"choices":[{"index":0,"delta":{"role":"assistant","content":""},"finish_reason":null}]}"#,
    );

    assert!(chunk.events().is_empty());
}

#[test]
fn test_tool_call_delta_fragments() {
    let chunk = parse_chunk(
        r#"{"choices":[{"index":0,"delta":{"tool_calls":[{"index":0,"id":"call_1","type":"function","function":{"name":"detect_pii","arguments":""}}]},"finish_reason":null}]}"#,
    );

    let events = chunk.events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        StreamEvent::ToolCall { index, id, name, .. } => {
            assert_eq!(*index, 0);
            assert_eq!(id.as_deref(), Some("call_1"));
            assert_eq!(name.as_deref(), Some("detect_pii"));
        }
        other => panic!("Expected ToolCall, got {:?}", other),
    }
}

#[test]
fn test_tool_call_argument_continuation_has_no_id() {
    let chunk = parse_chunk(
        r#"{"choices":[{"index":0,"delta":{"tool_calls":[{"index":0,"function":{"arguments":"{\"attachmentIndex\":0}"}}]},"finish_reason":null}]}"#,
    );

    match &chunk.events()[0] {
        StreamEvent::ToolCall { id, name, arguments, .. } => {
            assert!(id.is_none());
            assert!(name.is_none());
            assert_eq!(arguments.as_deref(), Some("{\"attachmentIndex\":0}"));
        }
        other => panic!("Expected ToolCall, got {:?}", other),
    }
}

#[test]
fn test_finish_reason_becomes_done_event() {
    let chunk =
        parse_chunk(r#"{"choices":[{"index":0,"delta":{},"finish_reason":"tool_calls"}]}"#);

    assert_eq!(
        chunk.events(),
        vec![StreamEvent::Done {
            finish_reason: Some("tool_calls".to_string()),
            usage: None,
        }]
    );
}

#[test]
fn test_usage_trailer_becomes_done_event() {
    let chunk = parse_chunk(
        r#"{"choices":[],"usage":{"prompt_tokens":120,"completion_tokens":30,"total_tokens":150}}"#,
    );

    assert_eq!(
        chunk.events(),
        vec![StreamEvent::Done {
            finish_reason: None,
            usage: Some(TokenUsage {
                input_tokens: 120,
                output_tokens: 30,
                total_tokens: 150,
            }),
        }]
    );
}

#[test]
fn test_finish_chunk_with_inline_usage() {
    let chunk = parse_chunk(
        r#"{"choices":[{"index":0,"delta":{},"finish_reason":"stop"}],"usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}"#,
    );

    match &chunk.events()[0] {
        StreamEvent::Done {
            finish_reason,
            usage,
        } => {
            assert_eq!(finish_reason.as_deref(), Some("stop"));
            assert_eq!(usage.as_ref().map(|u| u.total_tokens), Some(15));
        }
        other => panic!("Expected Done, got {:?}", other),
    }
}

#[test]
fn test_stream_event_serialization_roundtrip() {
    let event = StreamEvent::ToolCall {
        index: 1,
        id: Some("call_9".to_string()),
        name: None,
        arguments: Some("{".to_string()),
    };

    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"tool_call\""));

    let back: StreamEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}

#[test]
fn test_stream_event_done_serialization_skips_absent_fields() {
    let event = StreamEvent::Done {
        finish_reason: None,
        usage: None,
    };

    let json = serde_json::to_string(&event).unwrap();
    assert_eq!(json, r#"{"type":"done"}"#);
}
