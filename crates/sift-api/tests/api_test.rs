use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sift_agent::ProviderRegistry;
use sift_api::config::Config;
use sift_api::state::AppState;
use sift_llm::{GoogleClient, OpenAIClient};
use std::sync::Arc;
use tower::util::ServiceExt;

fn test_state(openai: bool, google: bool) -> Arc<AppState> {
    let config: Config = toml::from_str("").unwrap();

    let mut registry = ProviderRegistry::new();
    if openai {
        registry = registry.with_openai(Arc::new(OpenAIClient::new("test-key").unwrap()));
    }
    if google {
        registry = registry.with_google(Arc::new(GoogleClient::new("test-key").unwrap()));
    }

    Arc::new(AppState::new(config, registry))
}

async fn send_json(state: Arc<AppState>, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let app = sift_api::build_router(state);

    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

#[tokio::test]
async fn test_models_reflect_configured_credentials() {
    let (status, body) = send_json(test_state(false, true), "GET", "/api/models", None).await;

    assert_eq!(status, StatusCode::OK);
    let models = body["models"].as_array().unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0]["id"], "gemini-2.0-flash");
    assert_eq!(models[0]["provider"], "google");
}

#[tokio::test]
async fn test_models_with_both_providers() {
    let (status, body) = send_json(test_state(true, true), "GET", "/api/models", None).await;

    assert_eq!(status, StatusCode::OK);
    let models = body["models"].as_array().unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0]["id"], "gpt-4-turbo");
    assert_eq!(models[1]["id"], "gemini-2.0-flash");
}

#[tokio::test]
async fn test_chat_rejects_malformed_body_with_details() {
    let body = json!({
        "messages": [
            {"role": "robot", "content": ""}
        ]
    });

    let (status, response) =
        send_json(test_state(false, true), "POST", "/api/chat", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Invalid request data");
    assert!(!response["details"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_rejects_unknown_model() {
    let body = json!({
        "messages": [{"role": "user", "content": "Hi"}],
        "model": "claude-3"
    });

    let (status, response) =
        send_json(test_state(true, true), "POST", "/api/chat", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"]
        .as_str()
        .unwrap()
        .contains("Invalid model specified"));
}

#[tokio::test]
async fn test_chat_fails_closed_on_missing_credential() {
    // gpt-prefixed model, but only the Gemini credential is configured
    let body = json!({
        "messages": [{"role": "user", "content": "Hi"}],
        "model": "gpt-4-turbo"
    });

    let (status, response) =
        send_json(test_state(false, true), "POST", "/api/chat", Some(body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["error"], "OpenAI API key not configured");
}

#[tokio::test]
async fn test_health_reports_provider_configuration() {
    let (status, body) = send_json(test_state(true, false), "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["providers"]["openai"], "configured");
    assert_eq!(body["providers"]["google"], "not_configured");
}

#[tokio::test]
async fn test_api_error_status_mapping() {
    use axum::response::IntoResponse;
    use sift_api::error::ApiError;

    let response = ApiError::InvalidModel("llama-3".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ApiError::MissingCredential(sift_agent::Provider::OpenAI).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
