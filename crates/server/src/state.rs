use crate::config::ServerConfig;
use embedder::{EmbeddingHandler, ModelManager};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Model lifecycle manager (load-on-start, unload-on-stop, readiness)
    pub manager: Arc<ModelManager>,

    /// Request handler layered over the manager
    pub handler: EmbeddingHandler,
}

impl ServerState {
    /// Create new server state. The manager starts `Unloaded`; readiness
    /// arrives only after `start_server` loads the model, so requests racing
    /// startup see 503 rather than a half-initialized model.
    pub fn new(config: ServerConfig) -> Self {
        let manager = Arc::new(ModelManager::new(config.embedder_config()));
        let handler = EmbeddingHandler::new(manager.clone());

        Self {
            config: Arc::new(config),
            manager,
            handler,
        }
    }
}
