use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Backend selector for the model manager.
///
/// `Onnx` runs the real model locally and needs model/tokenizer files on disk.
/// `Stub` produces deterministic hash-derived vectors with no assets; it is an
/// explicitly configured choice (tests, smoke deployments), never a silent
/// fallback for a failed ONNX load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Onnx,
    Stub,
}

/// Runtime configuration for the model manager.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedderConfig {
    /// Model identifier surfaced in health responses.
    pub model_name: String,
    /// Path to the ONNX model file.
    pub model_path: PathBuf,
    /// Path to `tokenizer.json`.
    pub tokenizer_path: PathBuf,
    /// Which encoder backend to load.
    pub backend: Backend,
    /// Token truncation limit per text.
    pub max_sequence_length: usize,
    /// Intra-op threads for the ONNX session.
    pub intra_threads: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model_name: "intfloat/multilingual-e5-base".into(),
            model_path: PathBuf::from("./models/multilingual-e5-base/model.onnx"),
            tokenizer_path: PathBuf::from("./models/multilingual-e5-base/tokenizer.json"),
            backend: Backend::Onnx,
            max_sequence_length: 512,
            intra_threads: 4,
        }
    }
}

impl EmbedderConfig {
    /// Stub-backed config for tests and asset-free environments.
    pub fn stub() -> Self {
        Self {
            backend: Backend::Stub,
            ..Self::default()
        }
    }
}
