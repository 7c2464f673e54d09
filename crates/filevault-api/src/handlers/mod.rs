//! HTTP request handlers, grouped by resource.

pub mod admin;
pub mod bucket;
pub mod file;
pub mod folder;
pub mod health;
