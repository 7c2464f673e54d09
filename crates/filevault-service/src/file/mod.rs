//! File placement services: upload, listings, move/duplicate/patch, download.

pub mod download;
pub mod query;
pub mod relocation;
pub mod service;
pub mod upload;

pub use download::{DownloadResult, DownloadService};
pub use query::{FileListing, FileQuery, FileSortField, SortOrder};
pub use relocation::Relocator;
pub use service::{DuplicateFileRequest, FileService, UpdateFileRequest};
pub use upload::{UploadRequest, UploadService};

use tracing::error;

use filevault_core::result::AppResult;
use filevault_database::repositories::FileRepository;
use filevault_entity::File;

use crate::context::RequestContext;

/// Save a file record. When an object was already written for it, a failed
/// save leaves the two stores out of step; that is logged at error level.
pub(crate) async fn persist(
    ctx: &RequestContext,
    files: &dyn FileRepository,
    file: &File,
    object_written: bool,
) -> AppResult<()> {
    let result = ctx.guard(files.save(file)).await;
    if let Err(e) = &result {
        if object_written {
            error!(
                tenant_id = %ctx.tenant_id,
                file_id = %file.id,
                object_key = %file.object_key,
                error = %e,
                "File record not saved after object was written"
            );
        }
    }
    result
}
