//! Stateful directory listing: records, facets, filters and current page.
//!
//! Mirrors what the directory page keeps between user actions. Every
//! filter change recomputes the page count against the new filtered set;
//! if the active page no longer exists the browser goes back to page 1 and
//! reports it, so the caller can update the `?page=` parameter.

use log::debug;
use serde::Serialize;

use super::facets::{compute_facets, Facets};
use super::filters::{apply_filters, FilterState};
use super::pagination::{coerce_page, effective_page, page_links, paginate, total_pages, Page, PageLink};
use crate::config::DirectorySettings;
use crate::models::DirectoryEntry;

/// Navigation side effect of a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageChange {
    Unchanged,
    /// The previous page no longer exists; the browser is back on page 1.
    ResetToFirst { from: usize },
}

/// Everything needed to render one directory page.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryView<'a, T> {
    pub page: Page<&'a T>,
    pub links: Vec<PageLink>,
    pub facets: &'a Facets,
    pub filters: &'a FilterState,
}

impl<T> DirectoryView<'_, T> {
    pub fn is_empty(&self) -> bool {
        self.page.is_empty()
    }
}

pub struct DirectoryBrowser<T> {
    records: Vec<T>,
    facets: Facets,
    filters: FilterState,
    current_page: usize,
    page_size: usize,
}

impl<T: DirectoryEntry> DirectoryBrowser<T> {
    pub fn new(records: Vec<T>, page_size: usize) -> Self {
        let facets = compute_facets(&records);
        Self {
            records,
            facets,
            filters: FilterState::default(),
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn with_settings(records: Vec<T>, settings: &DirectorySettings) -> Self {
        Self::new(records, settings.page_size)
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of records passing the active filters.
    pub fn filtered_count(&self) -> usize {
        self.records.iter().filter(|r| self.filters.matches(*r)).count()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_count(), self.page_size)
    }

    /// Swap in a new collection; facets are recomputed from it.
    pub fn replace_records(&mut self, records: Vec<T>) -> PageChange {
        self.facets = compute_facets(&records);
        self.records = records;
        self.revalidate_page()
    }

    pub fn set_filters(&mut self, filters: FilterState) -> PageChange {
        self.filters = filters;
        self.revalidate_page()
    }

    pub fn set_search(&mut self, search: impl Into<String>) -> PageChange {
        self.filters.search = search.into();
        self.revalidate_page()
    }

    pub fn set_region(&mut self, region: impl Into<String>) -> PageChange {
        self.filters.region = region.into();
        self.revalidate_page()
    }

    pub fn set_kind(&mut self, kind: impl Into<String>) -> PageChange {
        self.filters.kind = kind.into();
        self.revalidate_page()
    }

    pub fn clear_filters(&mut self) -> PageChange {
        self.set_filters(FilterState::default())
    }

    /// Navigate to a raw page number; returns the page actually shown.
    pub fn go_to_page(&mut self, page: i64) -> usize {
        self.current_page = effective_page(coerce_page(page), self.total_pages());
        self.current_page
    }

    pub fn view(&self) -> DirectoryView<'_, T> {
        let filtered = apply_filters(&self.records, &self.filters);
        let page = paginate(&filtered, self.current_page as i64, self.page_size);
        let links = page_links(page.effective_page, page.total_pages);

        DirectoryView {
            page,
            links,
            facets: &self.facets,
            filters: &self.filters,
        }
    }

    fn revalidate_page(&mut self) -> PageChange {
        let total = self.total_pages();
        if self.current_page > total {
            debug!(
                "Page {} exceeds {} page(s) after filter change, resetting to 1",
                self.current_page, total
            );
            let from = self.current_page;
            self.current_page = 1;
            return PageChange::ResetToFirst { from };
        }
        PageChange::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DirectoryRecord;

    fn universities(count: usize, region: &str) -> Vec<DirectoryRecord> {
        (1..=count)
            .map(|i| DirectoryRecord::new(format!("{} University {}", region, i)).with_region(region))
            .collect()
    }

    #[test]
    fn test_initial_view() {
        let browser = DirectoryBrowser::new(universities(25, "Tashkent"), 12);
        let view = browser.view();
        assert_eq!(view.page.items.len(), 12);
        assert_eq!(view.page.total_pages, 3);
        assert_eq!(view.links, vec![PageLink::Page(1), PageLink::Page(2), PageLink::Page(3)]);
        assert_eq!(view.facets.regions, vec!["Tashkent"]);
    }

    #[test]
    fn test_filter_narrowing_resets_page() {
        let mut records = universities(20, "Tashkent");
        records.extend(universities(5, "Samarkand"));
        let mut browser = DirectoryBrowser::new(records, 12);

        assert_eq!(browser.go_to_page(3), 3);
        let change = browser.set_region("Tashkent");
        assert_eq!(change, PageChange::ResetToFirst { from: 3 });
        assert_eq!(browser.current_page(), 1);
        assert_eq!(browser.total_pages(), 2);
    }

    #[test]
    fn test_filter_change_within_range_keeps_page() {
        let mut browser = DirectoryBrowser::new(universities(30, "Tashkent"), 12);
        browser.go_to_page(2);
        assert_eq!(browser.set_search("University"), PageChange::Unchanged);
        assert_eq!(browser.current_page(), 2);
    }

    #[test]
    fn test_go_to_page_out_of_range() {
        let mut browser = DirectoryBrowser::new(universities(13, "Andijan"), 12);
        assert_eq!(browser.go_to_page(9), 1);
        assert_eq!(browser.go_to_page(-2), 1);
        assert_eq!(browser.go_to_page(2), 2);
    }

    #[test]
    fn test_no_results_view() {
        let mut browser = DirectoryBrowser::new(universities(3, "Namangan"), 12);
        browser.set_search("Oxford");
        let view = browser.view();
        assert!(view.is_empty());
        assert_eq!(view.page.total_pages, 1);
        assert_eq!(view.links, vec![PageLink::Page(1)]);
    }

    #[test]
    fn test_facets_ignore_filters_but_follow_records() {
        let mut records = universities(2, "Tashkent");
        records.extend(universities(2, "Fergana"));
        let mut browser = DirectoryBrowser::new(records, 12);

        browser.set_region("Fergana");
        assert_eq!(browser.facets().regions, vec!["Fergana", "Tashkent"]);

        browser.replace_records(universities(1, "Khiva"));
        assert_eq!(browser.facets().regions, vec!["Khiva"]);
        assert_eq!(browser.filtered_count(), 0);
    }

    #[test]
    fn test_clear_filters() {
        let mut browser = DirectoryBrowser::new(universities(5, "Nukus"), 2);
        browser.set_search("nothing matches");
        assert_eq!(browser.filtered_count(), 0);
        browser.clear_filters();
        assert_eq!(browser.filtered_count(), 5);
        assert_eq!(browser.total_pages(), 3);
    }
}
