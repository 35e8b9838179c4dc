use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use sift_agent::Attachment;
use thiserror::Error;

/// Request schema validation.
///
/// Takes the raw JSON body and either produces a normalized `ChatRequest`
/// or a `ValidationError` listing every offending field, not just the
/// first. The input value is only read; normalization happens on the
/// owned output.

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Error)]
#[error("Invalid request data ({} field error(s))", details.len())]
pub struct ValidationError {
    pub details: Vec<FieldError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    fn parse(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            "system" => Some(Role::System),
            _ => None,
        }
    }
}

/// Normalized message: id always present, role and content validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
}

pub fn validate_request(body: &Value, default_model: &str) -> Result<ChatRequest, ValidationError> {
    let mut errors: Vec<FieldError> = Vec::new();
    let mut messages: Vec<ChatMessage> = Vec::new();

    let empty: Vec<Value> = Vec::new();
    let raw_messages: &[Value] = match body.get("messages") {
        Some(Value::Array(items)) if !items.is_empty() => items,
        Some(Value::Array(_)) => {
            push_error(&mut errors, "messages", "must be a non-empty array");
            &empty
        }
        Some(_) => {
            push_error(&mut errors, "messages", "must be an array");
            &empty
        }
        None => {
            push_error(&mut errors, "messages", "is required");
            &empty
        }
    };

    // One timestamp per request: assigned ids stay unique under millisecond
    // collisions because the position index disambiguates.
    let assigned_at = Utc::now().timestamp_millis();

    for (index, raw) in raw_messages.iter().enumerate() {
        let path = format!("messages[{}]", index);

        let Some(obj) = raw.as_object() else {
            push_error(&mut errors, &path, "must be an object");
            continue;
        };

        let role = match obj.get("role").and_then(Value::as_str) {
            Some(value) => match Role::parse(value) {
                Some(role) => Some(role),
                None => {
                    push_error(
                        &mut errors,
                        &format!("{}.role", path),
                        "must be one of \"user\", \"assistant\", \"system\"",
                    );
                    None
                }
            },
            None => {
                push_error(&mut errors, &format!("{}.role", path), "must be a string");
                None
            }
        };

        let content = match obj.get("content").and_then(Value::as_str) {
            Some(value) if !value.is_empty() => Some(value.to_string()),
            Some(_) => {
                push_error(
                    &mut errors,
                    &format!("{}.content", path),
                    "must be a non-empty string",
                );
                None
            }
            None => {
                push_error(&mut errors, &format!("{}.content", path), "must be a string");
                None
            }
        };

        let attachments = validate_attachments(obj, &path, &mut errors);

        let id = match obj.get("id") {
            Some(Value::String(value)) if !value.is_empty() => value.clone(),
            None | Some(Value::Null) => assign_message_id(assigned_at, index),
            Some(Value::String(_)) => assign_message_id(assigned_at, index),
            Some(_) => {
                push_error(&mut errors, &format!("{}.id", path), "must be a string");
                assign_message_id(assigned_at, index)
            }
        };

        if let (Some(role), Some(content)) = (role, content) {
            messages.push(ChatMessage {
                id,
                role,
                content,
                attachments,
            });
        }
    }

    let model = match body.get("model") {
        None | Some(Value::Null) => default_model.to_string(),
        Some(Value::String(value)) if !value.is_empty() => value.clone(),
        Some(Value::String(_)) => default_model.to_string(),
        Some(_) => {
            push_error(&mut errors, "model", "must be a string");
            default_model.to_string()
        }
    };

    if !errors.is_empty() {
        return Err(ValidationError { details: errors });
    }

    Ok(ChatRequest { messages, model })
}

fn validate_attachments(
    message: &serde_json::Map<String, Value>,
    message_path: &str,
    errors: &mut Vec<FieldError>,
) -> Vec<Attachment> {
    // AI-SDK clients send attachments under `experimental_attachments`
    let raw = message
        .get("attachments")
        .or_else(|| message.get("experimental_attachments"));

    let items = match raw {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            push_error(
                errors,
                &format!("{}.attachments", message_path),
                "must be an array",
            );
            return Vec::new();
        }
    };

    let mut attachments = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let path = format!("{}.attachments[{}]", message_path, index);

        let Some(obj) = item.as_object() else {
            push_error(errors, &path, "must be an object");
            continue;
        };

        let mut string_field = |field: &str| -> Option<String> {
            match obj.get(field).and_then(Value::as_str) {
                Some(value) => Some(value.to_string()),
                None => {
                    push_error(errors, &format!("{}.{}", path, field), "must be a string");
                    None
                }
            }
        };

        let url = string_field("url");
        let pathname = string_field("pathname");
        let content_type = string_field("contentType");

        if let (Some(url), Some(pathname), Some(content_type)) = (url, pathname, content_type) {
            attachments.push(Attachment::new(url, pathname, content_type));
        }
    }

    attachments
}

fn push_error(errors: &mut Vec<FieldError>, path: &str, message: &str) {
    errors.push(FieldError {
        path: path.to_string(),
        message: message.to_string(),
    });
}

fn assign_message_id(timestamp_millis: i64, index: usize) -> String {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(9)
        .collect();
    format!("msg-{}-{}-{}", timestamp_millis, index, suffix)
}
