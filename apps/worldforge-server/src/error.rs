//! Mapping from library errors to JSON error responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use worldforge_assets::TemplateError;
use worldforge_common::PositionError;
use worldforge_persist::StoreError;

/// An error rendered as `{"error": "..."}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::NotFound(_) | StoreError::NotFoundAtPosition(_) => StatusCode::NOT_FOUND,
            StoreError::InvalidFormat(_)
            | StoreError::Validation(_)
            | StoreError::EmptyStructureName => StatusCode::BAD_REQUEST,
            StoreError::NotLoaded | StoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<TemplateError> for ApiError {
    fn from(err: TemplateError) -> Self {
        let status = match &err {
            TemplateError::NotFound(_) => StatusCode::NOT_FOUND,
            TemplateError::InvalidFormat(_) | TemplateError::InvalidName(_) => {
                StatusCode::BAD_REQUEST
            }
            TemplateError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PositionError> for ApiError {
    fn from(err: PositionError) -> Self {
        Self::bad_request(format!("invalid position: {err}"))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("request worker failed: {err}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "request failed");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
