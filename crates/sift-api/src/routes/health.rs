use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sift_agent::Provider;
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub providers: HashMap<String, String>,
}

/// Health check endpoint
///
/// Returns the service status and which providers are configured
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mut providers = HashMap::new();

    for provider in [Provider::OpenAI, Provider::Google] {
        let status = if state.registry.is_configured(provider) {
            "configured"
        } else {
            "not_configured"
        };
        providers.insert(provider.key().to_string(), status.to_string());
    }

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        providers,
    })
}
