//! File domain entities.

pub mod download;
pub mod model;

pub use download::DownloadLink;
pub use model::File;
