use std::sync::RwLock;
use tracing::info;

use crate::config::{Backend, EmbedderConfig};
use crate::stub::StubEncoder;
use crate::EmbedderError;

#[cfg(feature = "onnx")]
use crate::onnx::OnnxEncoder;

/// Encoder backend held by a `Ready` state.
enum Encoder {
    #[cfg(feature = "onnx")]
    Onnx(OnnxEncoder),
    Stub(StubEncoder),
    /// Encoder whose every inference fails, for exercising recovery paths.
    #[cfg(test)]
    Broken,
}

impl Encoder {
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedderError> {
        match self {
            #[cfg(feature = "onnx")]
            Encoder::Onnx(enc) => enc.encode_batch(texts),
            Encoder::Stub(enc) => Ok(enc.encode_batch(texts)),
            #[cfg(test)]
            Encoder::Broken => Err(EmbedderError::Inference("induced encoder failure".into())),
        }
    }
}

struct LoadedModel {
    encoder: Encoder,
    /// Dimensionality probed from the model at load time. Authoritative for
    /// every health/metadata response.
    dims: usize,
}

/// Process-level lifecycle: `Unloaded --start--> Ready --stop--> Unloaded`.
/// A failed start leaves the state `Unloaded` and the error is fatal to the
/// caller; there is no retry and no hot-reload path back through `Loading`.
enum ModelState {
    Unloaded,
    Loading,
    Ready(LoadedModel),
}

/// Owns model acquisition and teardown, exactly once per process lifetime.
///
/// The manager is a pure pass-through over the model capability: vectors from
/// [`encode_batch`](ModelManager::encode_batch) are not normalized here. The
/// embedding handler applies L2 normalization so this layer stays a thin
/// wrapper over whatever the model returns.
///
/// Encode calls hold the state read lock for the duration of the model call,
/// so `stop()` (write lock) drains in-flight encodes before freeing the model.
pub struct ModelManager {
    config: EmbedderConfig,
    state: RwLock<ModelState>,
}

impl ModelManager {
    /// Create an unloaded manager; call [`start`](Self::start) before serving.
    pub fn new(config: EmbedderConfig) -> Self {
        Self {
            config,
            state: RwLock::new(ModelState::Unloaded),
        }
    }

    /// Load the configured model and transition to `Ready`.
    ///
    /// On failure the state returns to `Unloaded` and the error propagates;
    /// callers are expected to abort startup rather than serve traffic.
    pub fn start(&self) -> Result<(), EmbedderError> {
        self.start_with(|| self.load_encoder())
    }

    fn start_with(
        &self,
        load_encoder: impl FnOnce() -> Result<Encoder, EmbedderError>,
    ) -> Result<(), EmbedderError> {
        {
            let mut state = self.state_write()?;
            match *state {
                ModelState::Unloaded => *state = ModelState::Loading,
                ModelState::Loading => {
                    return Err(EmbedderError::InvalidConfig(
                        "model load already in progress".into(),
                    ))
                }
                ModelState::Ready(_) => {
                    return Err(EmbedderError::InvalidConfig(
                        "model already loaded; no reload supported".into(),
                    ))
                }
            }
        }

        info!(model = %self.config.model_name, backend = ?self.config.backend, "loading embedding model");

        // Load and probe share one recovery arm: any failure between `Loading`
        // and `Ready` must put the state back to `Unloaded`, or every later
        // `start()` would misreport an in-progress load.
        let result = load_encoder().and_then(|encoder| {
            let dims = Self::probe_dims(&encoder)?;
            Ok(LoadedModel { encoder, dims })
        });
        let loaded = match result {
            Ok(loaded) => loaded,
            Err(err) => {
                *self.state_write()? = ModelState::Unloaded;
                return Err(err);
            }
        };

        info!(model = %self.config.model_name, dims = loaded.dims, "embedding model ready");
        *self.state_write()? = ModelState::Ready(loaded);
        Ok(())
    }

    /// Release the model instance. Idempotent if already unloaded.
    pub fn stop(&self) -> Result<(), EmbedderError> {
        let mut state = self.state_write()?;
        if matches!(*state, ModelState::Ready(_)) {
            info!(model = %self.config.model_name, "unloading embedding model");
        }
        *state = ModelState::Unloaded;
        Ok(())
    }

    /// Side-effect-free readiness query.
    pub fn is_ready(&self) -> bool {
        matches!(
            self.state.read().as_deref(),
            Ok(ModelState::Ready(_))
        )
    }

    /// Dimensionality recorded at load time; `NotReady` before a successful start.
    pub fn dims(&self) -> Result<usize, EmbedderError> {
        match &*self.state_read()? {
            ModelState::Ready(loaded) => Ok(loaded.dims),
            _ => Err(EmbedderError::NotReady),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.config.model_name
    }

    /// Delegate a batch to the loaded model. Vectors come back in input order,
    /// un-normalized. Fails with `NotReady` while not `Ready`.
    pub fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedderError> {
        let state = self.state_read()?;
        match &*state {
            ModelState::Ready(loaded) => {
                let vectors = loaded.encoder.encode_batch(texts)?;
                if vectors.len() != texts.len() {
                    return Err(EmbedderError::Inference(format!(
                        "model returned {} vectors for {} inputs",
                        vectors.len(),
                        texts.len()
                    )));
                }
                Ok(vectors)
            }
            _ => Err(EmbedderError::NotReady),
        }
    }

    fn load_encoder(&self) -> Result<Encoder, EmbedderError> {
        match self.config.backend {
            Backend::Stub => Ok(Encoder::Stub(StubEncoder::new())),
            #[cfg(feature = "onnx")]
            Backend::Onnx => Ok(Encoder::Onnx(OnnxEncoder::load(&self.config)?)),
            #[cfg(not(feature = "onnx"))]
            Backend::Onnx => Err(EmbedderError::InvalidConfig(
                "onnx backend requested but the `onnx` feature is disabled".into(),
            )),
        }
    }

    /// One throwaway inference to learn the model's true output dimensionality.
    fn probe_dims(encoder: &Encoder) -> Result<usize, EmbedderError> {
        let probe = vec!["dimension probe".to_string()];
        let vectors = encoder.encode_batch(&probe)?;
        vectors
            .first()
            .map(|v| v.len())
            .filter(|&dims| dims > 0)
            .ok_or_else(|| EmbedderError::ModelLoad("model produced no probe output".into()))
    }

    fn state_read(&self) -> Result<std::sync::RwLockReadGuard<'_, ModelState>, EmbedderError> {
        self.state
            .read()
            .map_err(|_| EmbedderError::Inference("model state lock poisoned".into()))
    }

    fn state_write(&self) -> Result<std::sync::RwLockWriteGuard<'_, ModelState>, EmbedderError> {
        self.state
            .write()
            .map_err(|_| EmbedderError::Inference("model state lock poisoned".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_DIMS;

    fn stub_manager() -> ModelManager {
        ModelManager::new(EmbedderConfig::stub())
    }

    #[test]
    fn manager_starts_unloaded() {
        let manager = stub_manager();
        assert!(!manager.is_ready());
        assert!(manager.dims().unwrap_err().is_not_ready());
    }

    #[test]
    fn start_transitions_to_ready() {
        let manager = stub_manager();
        manager.start().unwrap();
        assert!(manager.is_ready());
        assert_eq!(manager.dims().unwrap(), DEFAULT_DIMS);
    }

    #[test]
    fn double_start_is_rejected() {
        let manager = stub_manager();
        manager.start().unwrap();
        let err = manager.start().unwrap_err();
        assert!(matches!(err, EmbedderError::InvalidConfig(_)));
        // Still ready; the failed second start must not unload the model
        assert!(manager.is_ready());
    }

    #[test]
    fn stop_transitions_to_unloaded_and_is_idempotent() {
        let manager = stub_manager();
        manager.start().unwrap();
        manager.stop().unwrap();
        assert!(!manager.is_ready());
        // Idempotent
        manager.stop().unwrap();
        assert!(!manager.is_ready());
    }

    #[test]
    fn failed_probe_resets_state_for_retry() {
        let manager = stub_manager();
        let err = manager.start_with(|| Ok(Encoder::Broken)).unwrap_err();
        assert!(matches!(err, EmbedderError::Inference(_)));
        assert!(!manager.is_ready());

        // The failed start must leave `Unloaded`, not a stuck `Loading`: a
        // retry goes through the full load again rather than erroring out
        // with an in-progress report.
        manager.start().unwrap();
        assert!(manager.is_ready());
        assert_eq!(manager.dims().unwrap(), DEFAULT_DIMS);
    }

    #[test]
    fn encode_before_start_fails_not_ready() {
        let manager = stub_manager();
        let err = manager
            .encode_batch(&["hello".to_string()])
            .unwrap_err();
        assert!(err.is_not_ready());
    }

    #[test]
    fn encode_after_stop_fails_not_ready() {
        let manager = stub_manager();
        manager.start().unwrap();
        manager.stop().unwrap();
        let err = manager.encode_batch(&["hi".to_string()]).unwrap_err();
        assert!(err.is_not_ready());
    }

    #[test]
    fn encode_batch_preserves_count_and_order() {
        let manager = stub_manager();
        manager.start().unwrap();

        let texts: Vec<String> = vec!["a".into(), "b".into(), "a".into()];
        let vectors = manager.encode_batch(&texts).unwrap();
        assert_eq!(vectors.len(), 3);
        // Same input text, same vector; order preserved with duplicates intact
        assert_eq!(vectors[0], vectors[2]);
        assert_ne!(vectors[0], vectors[1]);
    }

    #[test]
    fn encode_batch_is_deterministic() {
        let manager = stub_manager();
        manager.start().unwrap();

        let texts = vec!["query: 삼성 노트북".to_string()];
        let first = manager.encode_batch(&texts).unwrap();
        let second = manager.encode_batch(&texts).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn manager_output_is_not_normalized() {
        // Normalization is the handler's job; the manager passes vectors through.
        let manager = stub_manager();
        manager.start().unwrap();

        let vectors = manager.encode_batch(&["some text".to_string()]).unwrap();
        let norm: f32 = vectors[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() > 1e-3, "stub output should not be unit-norm");
    }

    #[cfg(feature = "onnx")]
    #[test]
    #[ignore = "requires model assets under ./models/multilingual-e5-base"]
    fn onnx_end_to_end_with_local_assets() {
        let manager = ModelManager::new(EmbedderConfig::default());
        manager.start().unwrap();

        let texts = vec!["query: 무선 이어폰".to_string(), "passage: 노트북".to_string()];
        let vectors = manager.encode_batch(&texts).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].len(), manager.dims().unwrap());
        manager.stop().unwrap();
    }

    #[cfg(feature = "onnx")]
    #[test]
    fn onnx_start_fails_fatally_when_assets_missing() {
        let cfg = EmbedderConfig {
            model_path: "./missing/model.onnx".into(),
            tokenizer_path: "./missing/tokenizer.json".into(),
            ..EmbedderConfig::default()
        };
        let manager = ModelManager::new(cfg);
        let err = manager.start().unwrap_err();
        assert!(matches!(err, EmbedderError::ModelLoad(_)));
        // No silent stub fallback: the manager stays unloaded
        assert!(!manager.is_ready());
    }
}
