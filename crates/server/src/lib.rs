//! Embedding Service - HTTP API over the embedding core
//!
//! Serves synchronous encode requests against a single model instance loaded
//! once at startup. Readiness is gated: every embedding route answers 503
//! until the model finishes loading, and a failed load aborts the process.
//!
//! # API Endpoints
//!
//! - `POST /embed` — `{texts: [string; 1..100], prefix?: "query: "}` →
//!   `{embeddings: [[f32; dims]], dims}`
//! - `GET /embed/single?text=&prefix=` — single-text convenience shape
//! - `GET /health` — `{status: "ok", model, dims}` once ready, 503 before
//! - `GET /` — service metadata
//!
//! # Configuration
//!
//! Environment-driven: `MODEL_NAME` (default `intfloat/multilingual-e5-base`),
//! `PORT` (default 8000), `WORKERS` (default 1), plus model/tokenizer paths
//! and backend selection. An optional `embedding-service.toml` provides file
//! defaults.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
