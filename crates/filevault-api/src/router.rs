//! Route definitions for the FileVault HTTP API.
//!
//! Resource routes are mounted under `/api`; the health check sits at the
//! top level. The router receives `AppState` and passes it to all handlers
//! via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        // multipart framing on top of the payload
        .saturating_add(64 * 1024);

    let api_routes = Router::new()
        .merge(bucket_routes())
        .merge(folder_routes())
        .merge(file_routes())
        .merge(admin_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server);

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(handlers::health::health))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::timeout::request_timeout,
        ))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Bucket endpoints
fn bucket_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/buckets",
            post(handlers::bucket::create_bucket).get(handlers::bucket::list_buckets),
        )
        .route("/buckets/{id}", get(handlers::bucket::get_bucket))
        .route(
            "/buckets/{id}/folders",
            get(handlers::bucket::list_bucket_folders),
        )
        .route("/buckets/{id}/files", get(handlers::bucket::list_root_files))
        .route(
            "/buckets/{id}/files/all",
            get(handlers::bucket::list_bucket_files),
        )
}

/// Folder endpoints
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route("/folders", post(handlers::folder::create_folder))
        .route("/folders/tree", get(handlers::folder::list_tree))
        .route(
            "/folders/{id}",
            get(handlers::folder::get_folder)
                .patch(handlers::folder::update_folder)
                .delete(handlers::folder::delete_folder),
        )
        .route("/folders/{id}/move", post(handlers::folder::move_folder))
        .route("/folders/{id}/children", get(handlers::folder::list_children))
        .route("/folders/{id}/files", get(handlers::folder::list_files))
}

/// File endpoints
fn file_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/files",
            post(handlers::file::upload_file).get(handlers::file::list_tenant_files),
        )
        .route(
            "/files/{id}",
            get(handlers::file::get_file)
                .patch(handlers::file::update_file)
                .delete(handlers::file::delete_file),
        )
        .route("/files/{id}/download", get(handlers::file::download_file))
        .route("/files/{id}/download-url", get(handlers::file::download_url))
        .route("/files/{id}/move", post(handlers::file::move_file))
        .route("/files/{id}/duplicate", post(handlers::file::duplicate_file))
        .route("/files/{id}/restore", post(handlers::file::restore_file))
}

/// Maintenance endpoints
fn admin_routes() -> Router<AppState> {
    Router::new().route(
        "/admin/buckets/{id}/backfill",
        post(handlers::admin::backfill_paths),
    )
}
