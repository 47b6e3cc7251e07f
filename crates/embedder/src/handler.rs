use std::sync::Arc;
use tracing::debug;

use crate::model::ModelManager;
use crate::normalize::l2_normalize_in_place;
use crate::types::{EmbedOutput, HealthStatus, DEFAULT_DIMS, MAX_BATCH_SIZE};
use crate::EmbedderError;

/// Validates, shapes, and finalizes embedding responses. The only component
/// with business rules: prefixing, single-batch invocation, and unit-norm
/// output all live here, keeping the manager a pass-through.
#[derive(Clone)]
pub struct EmbeddingHandler {
    manager: Arc<ModelManager>,
}

impl EmbeddingHandler {
    pub fn new(manager: Arc<ModelManager>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &Arc<ModelManager> {
        &self.manager
    }

    /// Embed up to [`MAX_BATCH_SIZE`] texts with the given task prefix.
    ///
    /// The prefix is concatenated verbatim to every text (never parsed),
    /// order and duplicates are preserved, and the whole list goes to the
    /// model as one batch call. Every returned vector is L2-normalized; this
    /// is fixed behavior, not an option, since cosine similarity is the
    /// intended downstream metric.
    pub fn embed(&self, texts: &[String], prefix: &str) -> Result<EmbedOutput, EmbedderError> {
        if texts.is_empty() || texts.len() > MAX_BATCH_SIZE {
            return Err(EmbedderError::InvalidBatch(texts.len()));
        }

        let prefixed: Vec<String> = texts.iter().map(|t| format!("{prefix}{t}")).collect();
        let mut embeddings = self.manager.encode_batch(&prefixed)?;
        for vector in &mut embeddings {
            l2_normalize_in_place(vector);
        }

        // The first vector's length is authoritative; the static default only
        // covers the no-vectors case, which the min-length precondition rules out.
        let dims = embeddings.first().map_or(DEFAULT_DIMS, Vec::len);
        debug!(count = embeddings.len(), dims, "generated embeddings");

        Ok(EmbedOutput { embeddings, dims })
    }

    /// Single-text convenience shape: same contract as [`embed`](Self::embed),
    /// returned unwrapped.
    pub fn embed_single(
        &self,
        text: &str,
        prefix: &str,
    ) -> Result<(Vec<f32>, usize), EmbedderError> {
        let texts = [text.to_string()];
        let output = self.embed(&texts, prefix)?;
        let dims = output.dims;
        let vector = output
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbedderError::Inference("model returned no outputs".into()))?;
        Ok((vector, dims))
    }

    /// Readiness view: `NotReady` until the manager finished loading,
    /// afterwards the static model name plus the recorded dimensionality.
    pub fn health(&self) -> Result<HealthStatus, EmbedderError> {
        let dims = self.manager.dims()?;
        Ok(HealthStatus::ok(self.manager.model_name(), dims))
    }
}
