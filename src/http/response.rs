//! Response envelope and error mapping.
//!
//! Every response carries a `success` boolean. Failures carry an `error`
//! string and the instance id for correlation across replicas; a 404 and a
//! 500 are structurally identical apart from status and message, so
//! callers parse one shape.

use std::sync::OnceLock;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

static INSTANCE: OnceLock<String> = OnceLock::new();

/// Record this process's instance identifier for error envelopes.
/// First call wins; later calls are ignored.
pub fn set_instance(id: impl Into<String>) {
    let _ = INSTANCE.set(id.into());
}

/// The recorded instance identifier.
pub fn instance() -> &'static str {
    INSTANCE.get().map(String::as_str).unwrap_or("unknown")
}

/// Success envelope for a collection.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        let count = data.len();
        Self {
            success: true,
            data,
            count,
        }
    }
}

/// Success envelope for a single item.
#[derive(Debug, Serialize)]
pub struct ItemResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ItemResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub instance: String,
}

/// Error taxonomy for the API surface.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("storage operation failed")]
    Io(#[source] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Io(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::InvalidKey(message) => ApiError::Validation(message),
            StoreError::Io(error) => ApiError::Io(error),
            StoreError::Serialize(error) => ApiError::Internal(error.to_string()),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(error: std::io::Error) -> Self {
        ApiError::Io(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Full detail stays in the logs; the caller gets the message string.
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        }

        let body = ErrorBody {
            success: false,
            error: self.to_string(),
            instance: instance().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
