use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<crate::config::ConfigError> for AppError {
    fn from(err: crate::config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<crate::datasource::DataSourceError> for AppError {
    fn from(err: crate::datasource::DataSourceError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<crate::orchestration::OrchestrationError> for AppError {
    fn from(err: crate::orchestration::OrchestrationError) -> Self {
        match err {
            crate::orchestration::OrchestrationError::UnknownProtocol(name) => {
                AppError::NotFound(format!("protocol {}", name))
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<crate::engine::export::ExportError> for AppError {
    fn from(err: crate::engine::export::ExportError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Non-fatal conditions the engine reports alongside its results.
///
/// None of these abort a computation; the affected contribution is excluded
/// and the rest of the entity is still produced.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EngineIssue {
    #[error("{entity}: section key '{key}' does not match any declared chain")]
    MalformedKey { entity: String, key: String },
    #[error("{entity}: no section contributes to the selected scope")]
    MissingData { entity: String },
}
