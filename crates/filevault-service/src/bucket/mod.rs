//! Bucket provisioning.

pub mod service;

pub use service::{BucketService, CreateBucketRequest};
