use serde::{Deserialize, Serialize};

/// Task prefix for search queries (asymmetric e5-family convention).
pub const QUERY_PREFIX: &str = "query: ";
/// Task prefix for documents/passages.
pub const PASSAGE_PREFIX: &str = "passage: ";

/// Hard cap on texts per encode request.
pub const MAX_BATCH_SIZE: usize = 100;

/// Advertised dimensionality used only when no vectors are present at all.
/// The dimensionality probed from the loaded model is authoritative everywhere else.
pub const DEFAULT_DIMS: usize = 384;

/// Finalized embedding output: one unit-norm vector per input text, input order preserved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedOutput {
    pub embeddings: Vec<Vec<f32>>,
    /// Output dimensionality, taken from the first returned vector.
    pub dims: usize,
}

/// Read-only readiness view. Only constructible while the model is loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub model: String,
    pub dims: usize,
}

impl HealthStatus {
    pub fn ok(model: impl Into<String>, dims: usize) -> Self {
        Self {
            status: "ok".to_string(),
            model: model.into(),
            dims,
        }
    }
}
