use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use briefhub_export::error::ExportError;
use briefhub_fetch::error::FetchError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The image host failed us or served something unusable.
    BadGateway(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// A chart body that could not be turned into a page.
    pub fn unusable_chart(url: impl std::fmt::Display, e: ExportError) -> Self {
        match e {
            ExportError::NotPng | ExportError::Decode(_) | ExportError::EmptyImage { .. } => {
                ApiError::BadGateway(format!("chart {url} is not a usable PNG: {e}"))
            }
            other => other.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadGateway(msg) => {
                tracing::warn!("upstream chart error: {msg}");
                (StatusCode::BAD_GATEWAY, msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Client(msg) => ApiError::Internal(msg),
            other => ApiError::BadGateway(format!(
                "failed to fetch chart {}: {other}",
                other.url().unwrap_or("?")
            )),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(e: ExportError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("PDF assembly task failed: {e}"))
    }
}
