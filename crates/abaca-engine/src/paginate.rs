/// One page of an already sorted and filtered list
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// Effective page after clamping, 1-based
    pub page: usize,
    pub page_count: usize,
}

/// `ceil(total / page_size)`, never less than 1
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Slice out the requested page. Out-of-range requests are clamped into
/// `[1, page_count]` instead of producing an empty page.
pub fn paginate<T>(items: &[T], page_size: usize, requested_page: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let page_count = page_count(items.len(), page_size);
    let page = requested_page.clamp(1, page_count);

    let start = ((page - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());

    Page {
        items: &items[start..end],
        page,
        page_count,
    }
}
