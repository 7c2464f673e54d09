//! # filevault-database
//!
//! The metadata store. [`repositories`] defines the typed access the
//! engines consume (point lookups, secondary lookups by parent, bucket,
//! tenant and location, upsert, delete) and implements it on PostgreSQL;
//! [`memory`] implements the same traits on process-local maps.
//!
//! Neither backend offers multi-record transactions to the engines.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::Backend;
pub use memory::MemoryMetadataStore;
pub use store::MetadataStore;
