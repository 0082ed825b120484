use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::ServiceError;
use thiserror::Error;
use tracing::error;

/// JSON error response: `{"error": "..."}` with the given status.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Map a service error; `fallback` is the client-facing message for driver failures.
    pub fn from_service(e: ServiceError, fallback: &str) -> Self {
        match e {
            ServiceError::Model(_) => Self::bad_request("Invalid recipe ID"),
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Recipe not found"),
            ServiceError::Unavailable(msg) => {
                error!(error = %msg, "database unavailable");
                Self::internal(format!("Database not connected: {msg}"))
            }
            ServiceError::Db(msg) => {
                error!(error = %msg, "database operation failed");
                Self::internal(fallback)
            }
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
