//! History pagination.

/// Number of history entries shown per page.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// One window over a slice, with the numbers a pager needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// The requested page, 1-based. May exceed `total_pages`.
    pub current_page: usize,
    /// At least 1, even for an empty slice.
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Parse a `page` query value. Missing, non-numeric and `< 1` all mean page 1.
pub fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&page| page >= 1)
        .unwrap_or(1)
}

/// Slice out page `page` (1-based) of `items`.
///
/// Both window bounds are clamped to `items.len()`, so a page past the end
/// yields an empty window rather than an error.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page = page.max(1);
    let page_size = page_size.max(1);

    let total_pages = items.len().div_ceil(page_size).max(1);
    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());

    Page {
        items: &items[start..end],
        current_page: page,
        total_pages,
        has_prev: page > 1,
        has_next: page < total_pages,
    }
}
