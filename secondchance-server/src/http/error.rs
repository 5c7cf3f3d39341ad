//! API error type with IntoResponse
//!
//! Not-found keeps two body shapes: plain text on GET, a JSON object on
//! PUT and DELETE. Everything storage-related becomes a generic 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::ItemError;
use crate::models::ValidationError;
use crate::upload::UploadError;

pub const NOT_FOUND_MESSAGE: &str = "secondChanceItem not found";

/// Body shape of a 404
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundBody {
    Text,
    Json,
}

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Bad request body (400)
    Validation(ValidationError),

    /// No item with that id (404)
    NotFound(NotFoundBody),

    /// Store or filesystem failure (500, logged)
    Internal { message: String },
}

impl ApiError {
    /// Switch a JSON not-found to the plain-text form used by GET.
    pub fn into_plain_text(self) -> Self {
        match self {
            Self::NotFound(_) => Self::NotFound(NotFoundBody::Text),
            other => other,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "validation_error",
                    "message": e.to_string()
                })),
            )
                .into_response(),
            Self::NotFound(NotFoundBody::Text) => {
                (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response()
            }
            Self::NotFound(NotFoundBody::Json) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": NOT_FOUND_MESSAGE })),
            )
                .into_response(),
            Self::Internal { message } => {
                // Log the actual error, return generic message
                tracing::error!(error = %message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    })),
                )
                    .into_response()
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<ItemError> for ApiError {
    fn from(e: ItemError) -> Self {
        match e {
            ItemError::NotFound { .. } => Self::NotFound(NotFoundBody::Json),
            ItemError::Validation(v) => Self::Validation(v),
            other => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::MissingFileName => Self::Validation(ValidationError::Empty {
                field: "file name",
            }),
            UploadError::Io(_) => Self::Internal {
                message: e.to_string(),
            },
        }
    }
}
