//! University / textbook directory records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record field that upstream data delivers either as one label or as a
/// list of candidate labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    One(String),
    Many(Vec<String>),
}

impl FieldValue {
    /// Non-empty labels, trimmed, in stored order.
    pub fn labels(&self) -> Vec<&str> {
        let labels: Vec<&str> = match self {
            FieldValue::One(value) => vec![value.trim()],
            FieldValue::Many(values) => values.iter().map(|v| v.trim()).collect(),
        };
        labels.into_iter().filter(|v| !v.is_empty()).collect()
    }

    /// First non-empty label, trimmed for display.
    pub fn primary(&self) -> Option<&str> {
        self.stored_primary().map(str::trim)
    }

    /// First candidate that is not blank, exactly as stored.
    pub fn stored_primary(&self) -> Option<&str> {
        let candidates: &[String] = match self {
            FieldValue::One(value) => std::slice::from_ref(value),
            FieldValue::Many(values) => values,
        };
        candidates.iter().map(String::as_str).find(|v| !v.trim().is_empty())
    }

    /// Case-sensitive exact match against the stored primary label. Later
    /// candidates of a list and surrounding whitespace both count.
    pub fn matches_exactly(&self, label: &str) -> bool {
        self.stored_primary() == Some(label)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::One(value.to_string())
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::Many(values.into_iter().map(String::from).collect())
    }
}

/// What the filter/paginate engine needs to know about a record.
pub trait DirectoryEntry {
    fn title(&self) -> &str;
    fn region(&self) -> Option<&FieldValue>;
    fn kind(&self) -> Option<&FieldValue>;
}

/// A directory record as delivered by the content backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<FieldValue>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldValue>,
    /// Everything else (slug, address, website, ...) passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DirectoryRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            region: None,
            kind: None,
            extra: Map::new(),
        }
    }

    pub fn with_region(mut self, region: impl Into<FieldValue>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<FieldValue>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl DirectoryEntry for DirectoryRecord {
    fn title(&self) -> &str {
        &self.title
    }

    fn region(&self) -> Option<&FieldValue> {
        self.region.as_ref()
    }

    fn kind(&self) -> Option<&FieldValue> {
        self.kind.as_ref()
    }
}

impl<T: DirectoryEntry + ?Sized> DirectoryEntry for &T {
    fn title(&self) -> &str {
        (**self).title()
    }

    fn region(&self) -> Option<&FieldValue> {
        (**self).region()
    }

    fn kind(&self) -> Option<&FieldValue> {
        (**self).kind()
    }
}
