//! Core traits defined in `filevault-core` and implemented by other crates.

pub mod storage;

pub use storage::{ByteStream, ObjectStore, collect_stream};
