use serde_json::json;
use sift_llm::{Content, ContentPart, Message, Tool, ToolCall, ToolChoice};

#[test]
fn test_content_text_creation() {
    let content = Content::text("Hello, world!");
    assert_eq!(content.as_text().as_deref(), Some("Hello, world!"));
}

#[test]
fn test_content_from_str() {
    let content: Content = "Test".into();
    assert_eq!(content.as_text().as_deref(), Some("Test"));
}

#[test]
fn test_content_parts_text_only() {
    let content = Content::Parts(vec![ContentPart::text("Hello")]);
    assert_eq!(content.as_text().as_deref(), Some("Hello"));
}

#[test]
fn test_content_parts_mixed() {
    let content = Content::Parts(vec![
        ContentPart::text("Review this file"),
        ContentPart::file("resume.pdf", "data:application/pdf;base64,AAAA"),
    ]);
    assert_eq!(content.as_text().as_deref(), Some("Review this file"));
}

#[test]
fn test_content_parts_file_only_has_no_text() {
    let content = Content::Parts(vec![ContentPart::image_url("data:image/png;base64,AAAA")]);
    assert_eq!(content.as_text(), None);
}

#[test]
fn test_content_part_image_serialization() {
    let part = ContentPart::image_url("https://example.com/a.png");
    let json = serde_json::to_value(&part).unwrap();
    assert_eq!(json["type"], "image_url");
    assert_eq!(json["image_url"]["url"], "https://example.com/a.png");
}

#[test]
fn test_content_part_file_serialization() {
    let part = ContentPart::file("doc.pdf", "data:application/pdf;base64,AAAA");
    let json = serde_json::to_value(&part).unwrap();
    assert_eq!(json["type"], "file");
    assert_eq!(json["file"]["filename"], "doc.pdf");
}

#[test]
fn test_message_roles() {
    assert_eq!(Message::system("You are helpful").role(), "system");
    assert_eq!(Message::human("Hello").role(), "user");
    assert_eq!(Message::ai("Hi there!").role(), "assistant");
    assert_eq!(Message::tool_result("call_123", "42").role(), "tool");
}

#[test]
fn test_message_serialization_human() {
    let msg = Message::human("Hello");
    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"role\":\"user\""));
    assert!(json.contains("Hello"));
}

#[test]
fn test_message_serialization_ai() {
    let msg = Message::ai("Response");
    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"role\":\"assistant\""));
}

#[test]
fn test_message_deserialization() {
    let json = r#"{"role":"user","content":"Test"}"#;
    let msg: Message = serde_json::from_str(json).unwrap();
    assert_eq!(msg.role(), "user");
}

#[test]
fn test_message_tool_calls_accessor() {
    let calls = vec![ToolCall::new("call_1", "detect_pii", "{}")];
    let msg = Message::ai_with_tools(None, calls);
    assert_eq!(msg.tool_calls().map(|c| c.len()), Some(1));

    let plain = Message::ai("no tools");
    assert!(plain.tool_calls().is_none());
}

#[test]
fn test_tool_creation() {
    let tool = Tool::function(
        "detect_pii",
        "Scan an attachment for PII",
        json!({
            "type": "object",
            "properties": {
                "attachmentIndex": {"type": "integer"}
            }
        }),
    );

    assert_eq!(tool.function.name, "detect_pii");
    assert!(tool.function.description.is_some());
    assert_eq!(tool.tool_type, "function");
}

#[test]
fn test_tool_choice_modes() {
    assert_eq!(serde_json::to_value(ToolChoice::auto()).unwrap(), "auto");
    assert_eq!(serde_json::to_value(ToolChoice::none()).unwrap(), "none");
    assert_eq!(
        serde_json::to_value(ToolChoice::required()).unwrap(),
        "required"
    );
}

#[test]
fn test_tool_choice_force() {
    let choice = ToolChoice::force("detect_pii");
    let json = serde_json::to_value(&choice).unwrap();
    assert_eq!(json["type"], "function");
    assert_eq!(json["function"]["name"], "detect_pii");
}

#[test]
fn test_tool_call_parse_arguments() {
    let tool_call = ToolCall::new("call_123", "detect_pii", r#"{"attachmentIndex":2}"#);

    #[derive(serde::Deserialize)]
    struct Args {
        #[serde(rename = "attachmentIndex")]
        attachment_index: u32,
    }

    let args: Args = tool_call.parse_arguments().unwrap();
    assert_eq!(args.attachment_index, 2);
}

#[test]
fn test_tool_call_parse_arguments_rejects_garbage() {
    let tool_call = ToolCall::new("call_123", "detect_pii", "not json");
    let parsed: Result<serde_json::Value, _> = tool_call.parse_arguments();
    assert!(parsed.is_err());
}
