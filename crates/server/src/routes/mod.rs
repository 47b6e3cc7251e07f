//! API route handlers
//!
//! - `embed`: batch and single-text embedding
//! - `health`: readiness-gated health check

pub mod embed;
pub mod health;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// Service metadata, the root endpoint (GET /). Always available, even while
/// the model is still loading.
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "service": "Embedding Service",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/embed", "/embed/single", "/health"]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
