use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use embedder::EmbedderError;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types. Embedder errors are translated to HTTP status codes
/// only here, at the outermost layer.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Embedding error: {0}")]
    Embedder(#[from] EmbedderError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            // Readiness failures are distinguished from request-scoped ones:
            // not-ready is a retryable-by-caller 503, the rest of the taxonomy
            // surfaces as 500 with the underlying message.
            ServerError::Embedder(err) if err.is_not_ready() => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Embedder(EmbedderError::InvalidBatch(_)) => StatusCode::BAD_REQUEST,
            ServerError::Embedder(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Internal(_) | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::NotFound => "NOT_FOUND",
            ServerError::Embedder(err) if err.is_not_ready() => "SERVICE_UNAVAILABLE",
            ServerError::Embedder(EmbedderError::InvalidBatch(_)) => "BAD_REQUEST",
            ServerError::Embedder(_) => "EMBEDDING_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code().to_string();
        let message = self.to_string();

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
