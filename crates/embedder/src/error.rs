use thiserror::Error;

/// Errors surfaced by the model manager and the embedding handler.
#[derive(Debug, Error)]
pub enum EmbedderError {
    /// Model artifacts could not be loaded. Startup-only and fatal: a missing or
    /// corrupt model file is not self-healing, so callers must abort rather than retry.
    #[error("model load failed: {0}")]
    ModelLoad(String),

    /// An encode or health operation was invoked before the model reached `Ready`
    /// (or after shutdown). Retryable by the caller, never retried internally.
    #[error("model not ready")]
    NotReady,

    /// Request-scoped failure from the underlying model (e.g. transient resource
    /// exhaustion). Carries the underlying message, not retried internally.
    #[error("embedding failed: {0}")]
    Inference(String),

    /// Text count outside the accepted 1..=100 range. The HTTP boundary rejects
    /// this before the handler; this variant covers direct library callers.
    #[error("batch size {0} outside accepted range 1..=100")]
    InvalidBatch(usize),

    /// Configuration is inconsistent (unknown backend, double start, ...).
    #[error("invalid embedder config: {0}")]
    InvalidConfig(String),
}

impl EmbedderError {
    /// True for the transient not-ready signal that maps to a 503 at the boundary.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, EmbedderError::NotReady)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_model_load() {
        let err = EmbedderError::ModelLoad("/models/model.onnx: no such file".into());
        assert!(err.to_string().contains("model load failed"));
        assert!(err.to_string().contains("model.onnx"));
        assert!(!err.is_not_ready());
    }

    #[test]
    fn error_not_ready() {
        let err = EmbedderError::NotReady;
        assert_eq!(err.to_string(), "model not ready");
        assert!(err.is_not_ready());
    }

    #[test]
    fn error_inference_carries_message() {
        let err = EmbedderError::Inference("session run failed".into());
        assert!(err.to_string().contains("session run failed"));
    }

    #[test]
    fn error_invalid_batch() {
        let err = EmbedderError::InvalidBatch(101);
        assert!(err.to_string().contains("101"));
        assert!(err.to_string().contains("1..=100"));
    }

    #[test]
    fn error_debug_formatting() {
        let err = EmbedderError::InvalidConfig("unknown backend 'gpu'".into());
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("InvalidConfig"));
    }
}
