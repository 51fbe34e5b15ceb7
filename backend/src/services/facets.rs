//! Distinct region/type values for the directory filter dropdowns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{DirectoryEntry, FieldValue};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    /// Sorted, deduplicated region labels
    pub regions: Vec<String>,
    /// Sorted, deduplicated type labels
    pub types: Vec<String>,
}

impl Facets {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && self.types.is_empty()
    }
}

/// Union of all non-empty region and type labels across `records`.
///
/// Depends only on the collection, never on the active filter.
pub fn compute_facets<T: DirectoryEntry>(records: &[T]) -> Facets {
    let mut regions = BTreeSet::new();
    let mut types = BTreeSet::new();

    for record in records {
        collect_labels(record.region(), &mut regions);
        collect_labels(record.kind(), &mut types);
    }

    Facets {
        regions: regions.into_iter().collect(),
        types: types.into_iter().collect(),
    }
}

fn collect_labels(field: Option<&FieldValue>, into: &mut BTreeSet<String>) {
    if let Some(field) = field {
        into.extend(field.labels().into_iter().map(String::from));
    }
}
