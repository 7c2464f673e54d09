//! Page bounds and paged results for list operations.

use serde::{Deserialize, Serialize};

/// Page size used when none (or zero) is requested.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;
/// Largest page size served.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Normalized page bounds: `page` is 1-based and `limit` is within
/// `1..=MAX_PAGE_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u32,
    /// Items per page.
    pub limit: u32,
}

impl PageRequest {
    /// Clamp raw page parameters. A missing or zero page is the first page;
    /// a missing or zero limit is the default, and larger limits are capped.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let limit = match limit {
            None | Some(0) => DEFAULT_PAGE_LIMIT,
            Some(limit) => limit.min(MAX_PAGE_LIMIT),
        };
        Self {
            page: page.unwrap_or(1).max(1),
            limit,
        }
    }

    /// Number of items before this page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.limit as usize)
    }

    /// Cut this page out of a fully materialized, already ordered list.
    pub fn slice<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len() as u64;
        let items = items
            .into_iter()
            .skip(self.offset())
            .take(self.limit as usize)
            .collect();
        Page::new(items, *self, total)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Page number (1-based).
    pub page: u32,
    /// Items per page.
    pub limit: u32,
    /// Items across all pages.
    pub total: u64,
    /// Number of pages; zero for an empty list.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Wrap a page of items.
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(u64::from(request.limit)),
        }
    }

    /// Whether a later page exists.
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }
}
