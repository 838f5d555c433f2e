//! Pagination types for list endpoints.
//!
//! Client-supplied page values are normalized here, before any query runs.
//! Normalization never fails; invalid input degrades to the defaults.

use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Maximum page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Normalized request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: i64,
    /// Number of items per page, in `[1, 100]`.
    pub page_size: i64,
}

impl PageRequest {
    /// Normalize raw, client-supplied values into a valid page request.
    ///
    /// Missing or non-positive page becomes 1. Missing or non-positive
    /// page size becomes [`DEFAULT_PAGE_SIZE`]; values above
    /// [`MAX_PAGE_SIZE`] are clamped down to it.
    pub fn from_raw(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p,
            _ => 1,
        };
        let page_size = match page_size {
            Some(s) if s >= 1 => s.min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };
        Self { page, page_size }
    }

    /// Calculate the SQL `OFFSET` value.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper returned by every admin listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub data: Vec<T>,
    /// Total number of items matching the filters, across all pages.
    pub total: i64,
    /// Current page number (1-based).
    pub page: i64,
    /// Number of items per page.
    pub page_size: i64,
    /// Total number of pages.
    pub total_pages: i64,
}

impl<T> Page<T> {
    /// Create a paginated response from one page of data and the
    /// unpaginated total.
    pub fn new(data: Vec<T>, total: i64, request: &PageRequest) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            (total + request.page_size - 1) / request.page_size
        };
        Self {
            data,
            total,
            page: request.page,
            page_size: request.page_size,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_negative_page_normalize_to_one() {
        assert_eq!(PageRequest::from_raw(Some(0), None).page, 1);
        assert_eq!(PageRequest::from_raw(Some(-5), None).page, 1);
        assert_eq!(PageRequest::from_raw(None, None).page, 1);
        assert_eq!(PageRequest::from_raw(Some(3), None).page, 3);
    }

    #[test]
    fn page_size_clamps_into_range() {
        assert_eq!(PageRequest::from_raw(None, None).page_size, 20);
        assert_eq!(PageRequest::from_raw(None, Some(0)).page_size, 20);
        assert_eq!(PageRequest::from_raw(None, Some(-1)).page_size, 20);
        assert_eq!(PageRequest::from_raw(None, Some(101)).page_size, 100);
        assert_eq!(PageRequest::from_raw(None, Some(100)).page_size, 100);
        assert_eq!(PageRequest::from_raw(None, Some(1)).page_size, 1);
    }

    #[test]
    fn offset_is_zero_based() {
        let req = PageRequest::from_raw(Some(3), Some(25));
        assert_eq!(req.offset(), 50);
        assert_eq!(req.limit(), 25);
        assert_eq!(PageRequest::default().offset(), 0);
    }

    #[test]
    fn total_pages_rounds_up() {
        let req = PageRequest::from_raw(Some(1), Some(2));
        let page = Page::new(vec![1, 2], 3, &req);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total, 3);

        let empty: Page<i32> = Page::new(Vec::new(), 0, &req);
        assert_eq!(empty.total_pages, 1);
        assert!(empty.data.is_empty());
    }
}
