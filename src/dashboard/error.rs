//! Error type for dashboard handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::types::StatsError;

/// Handler error, rendered as JSON `{ "error": ..., "code": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or inconsistent league data.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// A malformed query or path parameter.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The FPL API (or the cache in front of it) failed.
    #[error("Upstream error: {0:#}")]
    Upstream(anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<StatsError>() {
            Some(stats) => ApiError::Stats(stats.clone()),
            None => ApiError::Upstream(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Stats(err) => match err {
                StatsError::GameweekNotFound(_) => {
                    (StatusCode::NOT_FOUND, "GAMEWEEK_NOT_FOUND", err.to_string())
                }
                StatsError::NoManagers => (StatusCode::BAD_REQUEST, "NO_MANAGERS", err.to_string()),
                _ => (StatusCode::BAD_REQUEST, "INVALID_DATA", err.to_string()),
            },
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Upstream(err) => {
                tracing::error!(error = %format!("{err:#}"), "Upstream request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "Failed to load data from the FPL API".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
