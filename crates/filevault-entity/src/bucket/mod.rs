//! Bucket domain entities.

pub mod model;

pub use model::{Bucket, BucketStatus};
