//! # filevault-storage
//!
//! Object store adapters for FileVault. Every adapter implements
//! [`filevault_core::traits::ObjectStore`]: the local filesystem adapter
//! keeps one directory per container, the in-memory adapter backs tests,
//! and the S3 adapter (feature `s3`) talks to Amazon S3 or a compatible
//! endpoint.

pub mod factory;
pub mod providers;
pub mod public_url;

pub use factory::build_object_store;
pub use providers::{LocalObjectStore, MemoryObjectStore};
pub use public_url::PublicUrlScheme;
