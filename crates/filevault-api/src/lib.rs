//! # filevault-api
//!
//! HTTP API layer for FileVault built on Axum.
//!
//! A thin shim over the engines in `filevault-service`: it resolves the
//! caller from gateway headers, turns request bodies into engine calls and
//! maps [`AppError`](filevault_core::AppError) kinds to status codes.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
