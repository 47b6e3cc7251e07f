//! Server initialization and routing
//!
//! Axum setup: router, middleware stack, model warm-up before the listener
//! binds, and graceful shutdown that unloads the model after draining.

use crate::config::ServerConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{api_info, embed, health, not_found};
use crate::state::ServerState;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware.
///
/// Exposed for integration tests, which drive the router directly via
/// `tower::ServiceExt` without a TCP listener.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let timeout = Duration::from_secs(state.config.timeout_secs);

    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/", get(api_info))
        .route("/embed", post(embed::embed))
        .route("/embed/single", get(embed::embed_single))
        .route("/health", get(health::health))
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(cors)
        .layer(from_fn(request_id))
        .layer(from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the embedding HTTP server.
///
/// Loads the model BEFORE binding the listener: a load failure propagates and
/// aborts startup, so the process never accepts traffic without a model. The
/// call blocks until SIGTERM or Ctrl+C, then unloads the model.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = Arc::new(ServerState::new(config));

    // Model warm-up. Fatal on failure; a missing or corrupt artifact is not
    // self-healing, so there is no retry.
    state.manager.start()?;

    let app = build_router(state.clone());
    let addr: SocketAddr = state.config.socket_addr()?;

    tracing::info!(
        model = %state.config.model_name,
        dims = state.manager.dims()?,
        "Starting embedding service on {addr}"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The state lock inside the manager drains in-flight encodes before the
    // model is freed; requests racing shutdown fail with a 503 instead.
    state.manager.stop()?;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
