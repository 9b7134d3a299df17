//! Pagination helpers shared by every listing view.

use serde::Serialize;

/// Number of pages needed for `count` items; 0 when there is nothing to show.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Half-open `[first, last)` item range of a 1-based page. Page 0 is read as page 1.
/// Bounds saturate at `usize::MAX`, so absurd pages land past the end.
pub fn page_bounds(page: usize, page_size: usize) -> (usize, usize) {
    let first = (page.max(1) - 1).saturating_mul(page_size);
    (first, first.saturating_add(page_size))
}

/// Items on `page`. Pages past the end are empty, never an error.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    let (first, _) = page_bounds(page, page_size);
    items.iter().skip(first).take(page_size).cloned().collect()
}

// == Page Links ==
/// One slot of a numbered pager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageLink {
    Page { number: usize, current: bool },
    Gap,
}

/// Pager layout: first and last page, the current page and its neighbours,
/// and a gap marker where pages are skipped. Empty when there is at most one page.
pub fn page_links(current: usize, total: usize) -> Vec<PageLink> {
    if total <= 1 {
        return Vec::new();
    }

    let mut links = Vec::new();
    for page in 1..=total {
        if page == 1 || page == total || (page + 1 >= current && page <= current.saturating_add(1)) {
            links.push(PageLink::Page {
                number: page,
                current: page == current,
            });
        } else if (page + 2 == current && current > 3)
            || (page == current.saturating_add(2) && current.saturating_add(2) < total)
        {
            links.push(PageLink::Gap);
        }
    }
    links
}
