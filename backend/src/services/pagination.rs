//! Fixed-size pages over a filtered record list.
//!
//! A requested page beyond the last page resets to page 1 instead of
//! clamping to the last page. Non-positive or non-numeric requests are
//! coerced to page 1 before any slicing.

use serde::Serialize;
use std::fmt;

pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Up to this many pages every page gets a link.
pub const FULL_LINK_LIST_MAX: usize = 7;

/// `max(1, ceil(count / page_size))`.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Map a raw page number onto `1..`, with anything below 1 becoming 1.
pub fn coerce_page(page: i64) -> usize {
    if page < 1 {
        1
    } else {
        usize::try_from(page).unwrap_or(1)
    }
}

/// Parse a `?page=` style value; missing or non-integer input is page 1.
pub fn parse_page_param(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map(coerce_page)
        .unwrap_or(1)
}

/// Page actually used for slicing: out-of-range requests reset to 1.
pub fn effective_page(requested: usize, total_pages: usize) -> usize {
    if requested == 0 || requested > total_pages {
        1
    } else {
        requested
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub total_pages: usize,
    pub effective_page: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    /// Nothing matched; the UI shows its "no results" state.
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    pub fn has_previous(&self) -> bool {
        self.effective_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.effective_page < self.total_pages
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            total_pages: self.total_pages,
            effective_page: self.effective_page,
            page_size: self.page_size,
        }
    }
}

/// Slice one page out of `records`.
pub fn paginate<T: Clone>(records: &[T], page: i64, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = total_pages(records.len(), page_size);
    let current = effective_page(coerce_page(page), total);

    let start = (current - 1) * page_size;
    let end = (start + page_size).min(records.len());
    let items = records.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    Page {
        items,
        total_items: records.len(),
        total_pages: total,
        effective_page: current,
        page_size,
    }
}

/// Entry in the page-link control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageLink {
    Page(usize),
    /// Non-interactive gap marker
    Ellipsis,
}

impl PageLink {
    pub fn is_clickable(&self) -> bool {
        matches!(self, PageLink::Page(_))
    }
}

impl fmt::Display for PageLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageLink::Page(n) => write!(f, "{}", n),
            PageLink::Ellipsis => write!(f, "…"),
        }
    }
}

/// Links to show for `current` out of `total` pages.
pub fn page_links(current: usize, total: usize) -> Vec<PageLink> {
    let total = total.max(1);
    let current = effective_page(current, total);

    if total <= FULL_LINK_LIST_MAX {
        return (1..=total).map(PageLink::Page).collect();
    }

    let mut links = vec![PageLink::Page(1)];
    if current <= 3 {
        links.extend((2..=5).map(PageLink::Page));
        links.push(PageLink::Ellipsis);
        links.push(PageLink::Page(total));
    } else if current >= total - 2 {
        links.push(PageLink::Ellipsis);
        links.extend((total - 4..=total).map(PageLink::Page));
    } else {
        links.push(PageLink::Ellipsis);
        links.extend((current - 1..=current + 1).map(PageLink::Page));
        links.push(PageLink::Ellipsis);
        links.push(PageLink::Page(total));
    }
    links
}
