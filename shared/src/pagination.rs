//! Pagination request/response types

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 12;
pub const MAX_PER_PAGE: u32 = 100;

/// `?page=&per_page=` query parameters (1-based page)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    /// Page number, clamped to >= 1
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, clamped to 1..=MAX_PER_PAGE
    pub fn per_page(&self) -> u32 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    /// SQL `LIMIT`
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page())
    }

    /// SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * i64::from(self.per_page())
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    /// Total number of matching records
    pub total: u64,
    /// Current page (1-based)
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, query: PageQuery) -> Self {
        let per_page = query.per_page();
        let total_pages = total.div_ceil(u64::from(per_page)) as u32;
        Self {
            data,
            total,
            page: query.page(),
            per_page,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        let q = PageQuery::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.per_page(), DEFAULT_PER_PAGE);
        assert_eq!(q.offset(), 0);

        let q = PageQuery::new(0, 1000);
        assert_eq!(q.page(), 1);
        assert_eq!(q.per_page(), MAX_PER_PAGE);
    }

    #[test]
    fn test_offset() {
        let q = PageQuery::new(3, 9);
        assert_eq!(q.limit(), 9);
        assert_eq!(q.offset(), 18);
    }

    #[test]
    fn test_total_pages() {
        let page = PaginatedResponse::new(vec![1, 2, 3], 21, PageQuery::new(1, 10));
        assert_eq!(page.total_pages, 3);

        let empty: PaginatedResponse<i32> = PaginatedResponse::new(vec![], 0, PageQuery::default());
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_map_keeps_paging() {
        let page = PaginatedResponse::new(vec![1, 2], 12, PageQuery::new(2, 10)).map(|n| n * 10);
        assert_eq!(page.data, vec![10, 20]);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 2);
    }
}
