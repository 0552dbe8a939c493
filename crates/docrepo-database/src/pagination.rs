//! Page metadata calculation.

use docrepo_core::types::Pagination;

/// Compute page metadata from a match count.
///
/// `page` is not checked against the page count: a page past the end is
/// valid and simply has no records. A zero `page_size` yields zero pages.
pub fn paginate(page: u64, page_size: u64, total: u64) -> Pagination {
    let total_pages = if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    };
    Pagination {
        page,
        page_size,
        total,
        total_pages,
    }
}

/// Number of records preceding `page`.
pub fn skip_for(page: u64, page_size: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(page_size)
}
