use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

/// GET /health — readiness-gated health check.
///
/// 503 until the model finishes loading; afterwards the static model name and
/// the dimensionality recorded at load time.
pub async fn health(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let status = state.handler.health()?;
    Ok(Json(status))
}
