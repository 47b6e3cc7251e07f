use embedder::{Backend, EmbedderConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
///
/// Field names double as environment variable names through the `config`
/// crate's environment source, preserving the service's external contract:
/// `MODEL_NAME`, `PORT`, `WORKERS` (plus the rest for completeness).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Tokio worker threads (0 = runtime default)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Embedding model identifier
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Path to the ONNX model file
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Path to tokenizer.json
    #[serde(default = "default_tokenizer_path")]
    pub tokenizer_path: PathBuf,

    /// Encoder backend: "onnx" or "stub"
    #[serde(default = "default_backend")]
    pub backend: Backend,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Allow cross-origin requests
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level filter
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            workers: default_workers(),
            model_name: default_model_name(),
            model_path: default_model_path(),
            tokenizer_path: default_tokenizer_path(),
            backend: default_backend(),
            timeout_secs: default_timeout_secs(),
            enable_cors: default_true(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from an optional config file, overridden by
    /// environment variables (`MODEL_NAME`, `PORT`, `WORKERS`, ...).
    pub fn load() -> anyhow::Result<Self> {
        // .env is a convenience for local runs; absence is fine.
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder()
            .add_source(config::File::with_name("embedding-service").required(false))
            .add_source(config::Environment::default());

        let config: ServerConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Core embedder settings derived from the server config.
    pub fn embedder_config(&self) -> EmbedderConfig {
        EmbedderConfig {
            model_name: self.model_name.clone(),
            model_path: self.model_path.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
            backend: self.backend,
            ..EmbedderConfig::default()
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_workers() -> usize {
    1
}

fn default_model_name() -> String {
    "intfloat/multilingual-e5-base".to_string()
}

fn default_model_path() -> PathBuf {
    PathBuf::from("./models/multilingual-e5-base/model.onnx")
}

fn default_tokenizer_path() -> PathBuf {
    PathBuf::from("./models/multilingual-e5-base/tokenizer.json")
}

fn default_backend() -> Backend {
    Backend::Onnx
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.workers, 1);
        assert_eq!(cfg.model_name, "intfloat/multilingual-e5-base");
        assert_eq!(cfg.backend, Backend::Onnx);
        assert_eq!(cfg.timeout_secs, 30);
        assert!(cfg.enable_cors);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_embedder_config_inherits_model_settings() {
        let cfg = ServerConfig {
            model_name: "custom/model".into(),
            backend: Backend::Stub,
            ..ServerConfig::default()
        };
        let embedder_cfg = cfg.embedder_config();
        assert_eq!(embedder_cfg.model_name, "custom/model");
        assert_eq!(embedder_cfg.backend, Backend::Stub);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let cfg: ServerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.bind_addr, "0.0.0.0");
    }
}
