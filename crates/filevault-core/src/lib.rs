//! # filevault-core
//!
//! Core crate for FileVault. Contains the unified error system, configuration
//! schemas, typed identifiers, the pure path and object-key builder, and the
//! object store trait consumed by the engines.
//!
//! This crate has **no** internal dependencies on other FileVault crates.

pub mod config;
pub mod error;
pub mod path;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
