use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use embedder::{MAX_BATCH_SIZE, QUERY_PREFIX};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Request body for POST /embed
#[derive(Debug, Deserialize)]
pub struct EmbedRequest {
    /// Texts to embed, 1..=100 items
    pub texts: Vec<String>,

    /// Task prefix, concatenated verbatim to every text.
    /// `"query: "` for search queries, `"passage: "` for documents.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_prefix() -> String {
    QUERY_PREFIX.to_string()
}

/// Response body for POST /embed
#[derive(Debug, Serialize)]
pub struct EmbedResponse {
    pub embeddings: Vec<Vec<f32>>,
    pub dims: usize,
}

/// Query parameters for GET /embed/single
#[derive(Debug, Deserialize)]
pub struct EmbedSingleQuery {
    pub text: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

/// POST /embed — batch embedding.
///
/// The text-count bound is enforced here, before the handler, so an invalid
/// request never reaches the model.
pub async fn embed(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<EmbedRequest>,
) -> ServerResult<impl IntoResponse> {
    if request.texts.is_empty() || request.texts.len() > MAX_BATCH_SIZE {
        return Err(ServerError::BadRequest(format!(
            "texts must contain 1 to {MAX_BATCH_SIZE} items (got {})",
            request.texts.len()
        )));
    }

    let output = state.handler.embed(&request.texts, &request.prefix)?;

    Ok(Json(EmbedResponse {
        embeddings: output.embeddings,
        dims: output.dims,
    }))
}

/// GET /embed/single?text=&prefix= — single-text convenience shape.
pub async fn embed_single(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<EmbedSingleQuery>,
) -> ServerResult<impl IntoResponse> {
    let (embedding, dims) = state.handler.embed_single(&query.text, &query.prefix)?;

    Ok(Json(json!({
        "embedding": embedding,
        "dims": dims,
    })))
}
