//! Embedding service binary.
//!
//! Loads configuration from the environment, sizes the runtime from the
//! `WORKERS` setting, and runs the server until SIGTERM/Ctrl+C.

use server::ServerConfig;

fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(false)
        .json()
        .init();

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    if config.workers > 0 {
        builder.worker_threads(config.workers);
    }
    let runtime = builder.enable_all().build()?;

    runtime.block_on(server::start_server(config))
}
