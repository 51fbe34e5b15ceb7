//! Directory search and facet filters.
//!
//! Search is a case-insensitive substring match on the title; region and
//! type are case-sensitive exact matches on the stored label. Filter values
//! are used as given; only an empty string means "no constraint". All
//! active constraints are ANDed and the input order is kept.

use serde::{Deserialize, Serialize};

use crate::models::{DirectoryEntry, FieldValue};

/// Active filters. An empty value means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub search: String,
    pub region: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FilterState {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.region.is_empty() && self.kind.is_empty()
    }

    /// Whether `record` satisfies every active constraint.
    pub fn matches<T: DirectoryEntry + ?Sized>(&self, record: &T) -> bool {
        matches_search(record, &self.search)
            && matches_facet(record.region(), &self.region)
            && matches_facet(record.kind(), &self.kind)
    }
}

/// Case-insensitive title substring match; empty search matches everything.
pub fn matches_search<T: DirectoryEntry + ?Sized>(record: &T, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    record.title().to_lowercase().contains(&search.to_lowercase())
}

/// Exact, case-sensitive facet match; an empty wanted value matches everything.
pub fn matches_facet(field: Option<&FieldValue>, wanted: &str) -> bool {
    if wanted.is_empty() {
        return true;
    }
    field.map(|f| f.matches_exactly(wanted)).unwrap_or(false)
}

/// Records satisfying `filters`, in their original order.
pub fn apply_filters<'a, T: DirectoryEntry>(records: &'a [T], filters: &FilterState) -> Vec<&'a T> {
    records.iter().filter(|r| filters.matches(*r)).collect()
}
