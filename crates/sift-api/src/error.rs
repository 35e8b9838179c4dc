use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sift_agent::{DispatchError, Provider};
use thiserror::Error;

use crate::config;
use crate::validate::ValidationError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request data")]
    Validation(#[from] ValidationError),

    #[error("Invalid model specified: {0}")]
    InvalidModel(String),

    #[error("{0} API key not configured")]
    MissingCredential(Provider),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<DispatchError> for ApiError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::UnknownModel(model) => Self::InvalidModel(model),
            DispatchError::MissingCredential(provider) => Self::MissingCredential(provider),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(ref e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Invalid request data",
                    "details": e.details.clone(),
                }),
            ),
            ApiError::InvalidModel(_) => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            ApiError::MissingCredential(_) => {
                tracing::error!("Dispatch refused: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string() }),
                )
            }
            ApiError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Configuration error" }),
                )
            }
            ApiError::Internal(ref e) => {
                tracing::error!("Internal error: {:#}", e);
                // Detailed message only outside production
                let message = if config::is_production() {
                    "An error occurred".to_string()
                } else {
                    format!("{:#}", e)
                };
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
