//! Filtering, ordering and paging of tenant-wide file listings.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use filevault_core::types::{FolderId, Page, PageRequest};
use filevault_entity::File;

/// Field a file listing is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileSortField {
    /// File name.
    Name,
    /// Size in bytes.
    Size,
    /// MIME type.
    ContentType,
    /// Upload time.
    #[default]
    CreatedAt,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

/// Tenant-wide file listing parameters. Every filter is optional and all
/// given filters must match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQuery {
    /// Page number (1-based).
    pub page: Option<u32>,
    /// Items per page.
    pub limit: Option<u32>,
    /// Ordering field.
    pub sort_by: FileSortField,
    /// Ordering direction.
    pub order: SortOrder,
    /// Only files directly inside this folder.
    pub folder_id: Option<FolderId>,
    /// Extension, with or without the leading dot; case-insensitive.
    pub extension: Option<String>,
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
    /// Minimum size in bytes, inclusive.
    pub min_size: Option<i64>,
    /// Maximum size in bytes, inclusive.
    pub max_size: Option<i64>,
    /// Uploaded at or after.
    pub from_date: Option<DateTime<Utc>>,
    /// Uploaded at or before.
    pub to_date: Option<DateTime<Utc>>,
}

/// A page of files plus the total size of every match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListing {
    /// The requested page.
    pub files: Page<File>,
    /// Sum of `size_bytes` over all matching files, not only this page.
    pub total_size: i64,
}

impl FileQuery {
    /// Normalized page bounds.
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    /// Whether a file satisfies every filter. Deletion state is not checked.
    pub fn matches(&self, file: &File) -> bool {
        if self.folder_id.is_some() && file.folder_id != self.folder_id {
            return false;
        }
        if let Some(wanted) = self
            .extension
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .map(normalize_extension)
        {
            let actual = file.extension().unwrap_or("");
            if !actual.eq_ignore_ascii_case(&wanted) {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            if !file.name.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        if self.min_size.is_some_and(|min| file.size_bytes < min)
            || self.max_size.is_some_and(|max| file.size_bytes > max)
        {
            return false;
        }
        if self.from_date.is_some_and(|from| file.created_at < from)
            || self.to_date.is_some_and(|to| file.created_at > to)
        {
            return false;
        }
        true
    }

    /// Order two files by the requested field and direction. Ties fall back
    /// to the id so pages are stable.
    pub fn compare(&self, a: &File, b: &File) -> Ordering {
        let ordering = match self.sort_by {
            FileSortField::Name => a.name.cmp(&b.name),
            FileSortField::Size => a.size_bytes.cmp(&b.size_bytes),
            FileSortField::ContentType => a.content_type.cmp(&b.content_type),
            FileSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
        .then_with(|| a.id.cmp(&b.id));

        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Filter, order and page a tenant's files.
    pub fn apply(&self, files: Vec<File>) -> FileListing {
        let mut matched: Vec<File> = files
            .into_iter()
            .filter(|f| f.is_active() && self.matches(f))
            .collect();
        matched.sort_by(|a, b| self.compare(a, b));

        let total_size = matched.iter().map(|f| f.size_bytes).sum();
        FileListing {
            files: self.page_request().slice(matched),
            total_size,
        }
    }
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}
