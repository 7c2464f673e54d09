//! Application builder: wires router, middleware and state into an Axum app.

use std::sync::Arc;

use axum::Router;
use tracing::info;

use filevault_core::config::AppConfig;
use filevault_core::error::AppError;
use filevault_database::MetadataStore;
use filevault_storage::build_object_store;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the FileVault server with the given configuration.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!("Starting FileVault server...");

    info!(provider = ?config.database.provider, "Connecting metadata store...");
    let metadata = MetadataStore::connect(&config.database).await?;

    info!(provider = ?config.storage.provider, "Initializing object store...");
    let objects = build_object_store(&config.storage).await?;

    let addr = config.server.bind_address();
    let state = AppState::new(config, metadata.clone(), Arc::clone(&objects));
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("FileVault server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    metadata.close().await;
    info!("FileVault server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
