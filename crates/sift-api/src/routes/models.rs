use axum::{extract::State, Json};
use serde::Serialize;
use sift_agent::Provider;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModelDescriptor {
    pub id: String,
    pub name: String,
    #[schema(value_type = String)]
    pub provider: Provider,
    pub description: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModelsResponse {
    pub models: Vec<ModelDescriptor>,
}

/// List the models available to this deployment
///
/// The list reflects which provider credentials are configured at the time
/// of the call; nothing is cached.
#[utoipa::path(
    get,
    path = "/api/models",
    responses(
        (status = 200, description = "Available models", body = ModelsResponse)
    ),
    tag = "models"
)]
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    let mut models = Vec::new();

    if state.registry.is_configured(Provider::OpenAI) {
        models.push(ModelDescriptor {
            id: "gpt-4-turbo".to_string(),
            name: "GPT-4 Turbo".to_string(),
            provider: Provider::OpenAI,
            description: "Most capable OpenAI model".to_string(),
        });
    }

    if state.registry.is_configured(Provider::Google) {
        models.push(ModelDescriptor {
            id: "gemini-2.0-flash".to_string(),
            name: "Gemini 2.0 Flash".to_string(),
            provider: Provider::Google,
            description: "Fast and efficient Google model".to_string(),
        });
    }

    Json(ModelsResponse { models })
}
