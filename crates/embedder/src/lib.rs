//! Embedding service core.
//!
//! Two components, mirroring the service's contract:
//!
//! - [`ModelManager`] owns the single loaded model instance: load-on-start,
//!   unload-on-stop, readiness flag, and a pass-through batch encode. The
//!   state is an explicit `Unloaded | Loading | Ready` tag, not a nullable
//!   global, and there is no hot-reload path.
//! - [`EmbeddingHandler`] holds the business rules: task prefixing
//!   (`query: ` for searches, `passage: ` for documents, per the e5 model
//!   family), one batched model call per request, and fixed L2 normalization
//!   of every output vector.
//!
//! Two backends exist behind the manager. The default `onnx` backend runs the
//! model locally via `ort` + `tokenizers` with attention-weighted mean
//! pooling. The `stub` backend produces deterministic hash-derived vectors
//! and must be selected explicitly; a failed ONNX load is fatal, never a
//! silent downgrade.
//!
//! ## Quick example
//!
//! ```
//! use std::sync::Arc;
//! use embedder::{EmbedderConfig, EmbeddingHandler, ModelManager, QUERY_PREFIX};
//!
//! let manager = Arc::new(ModelManager::new(EmbedderConfig::stub()));
//! manager.start().unwrap();
//!
//! let handler = EmbeddingHandler::new(manager);
//! let output = handler.embed(&["big cat".to_string()], QUERY_PREFIX).unwrap();
//! assert_eq!(output.embeddings.len(), 1);
//! assert_eq!(output.embeddings[0].len(), output.dims);
//! ```

pub mod config;
pub mod error;
pub mod types;

mod handler;
mod model;
mod normalize;
mod stub;

#[cfg(feature = "onnx")]
mod onnx;

pub use crate::config::{Backend, EmbedderConfig};
pub use crate::error::EmbedderError;
pub use crate::handler::EmbeddingHandler;
pub use crate::model::ModelManager;
pub use crate::types::{
    EmbedOutput, HealthStatus, DEFAULT_DIMS, MAX_BATCH_SIZE, PASSAGE_PREFIX, QUERY_PREFIX,
};
