//! List pagination helpers
//!
//! Deterministic slicing of an already-fetched list: page numbers are
//! 1-indexed, the page size is clamped to [1, 100], and an out-of-range
//! page clamps to the last page whenever there is at least one.

use serde::{Deserialize, Serialize};

const DEFAULT_PER_PAGE: usize = 20;
const MAX_PER_PAGE: usize = 100;

/// Query parameters for paginated endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl PageParams {
    /// Requested page, at least 1
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Requested page size, clamped to [1, 100]
    pub fn per_page(&self) -> usize {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// One page of items plus metadata
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

/// Slice a list into the requested page
pub fn paginate<T>(items: Vec<T>, params: &PageParams) -> Paginated<T> {
    let per_page = params.per_page();
    let mut page = params.page();

    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);

    if page > total_pages && total_pages > 0 {
        page = total_pages;
    }

    let start = (page - 1) * per_page;
    let page_items: Vec<T> = items.into_iter().skip(start).take(per_page).collect();

    Paginated {
        items: page_items,
        pagination: PageInfo {
            page,
            per_page,
            total_items,
            total_pages,
            has_previous: page > 1,
            has_next: page < total_pages,
        },
    }
}
