//! Server runner: builds the router and serves until shutdown.

use crate::config::ServerConfig;
use crate::error::SrvError;
use crate::routes;
use axum::routing::{get, post};
use axum::Router;
use osprey_recon::ReconEngine;
use std::sync::Arc;
use tracing::info;

/// Build the application router around an engine.
#[must_use]
pub fn router(engine: Arc<ReconEngine>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/reconnaissance", post(routes::reconnaissance))
        .with_state(engine)
}

/// Start the HTTP server with the given configuration.
///
/// Wires the production adapters from the configured credentials, binds
/// the listener, and runs until shutdown.
pub async fn serve(config: ServerConfig) -> crate::Result<()> {
    let engine = Arc::new(ReconEngine::from_credentials(&config.credentials));
    let app = router(engine);

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .map_err(|e| SrvError::Server(format!("bind {}: {e}", config.listen)))?;

    info!(addr = %config.listen, "osprey reconnaissance server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| SrvError::Server(e.to_string()))?;

    Ok(())
}
