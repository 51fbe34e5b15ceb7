use log::{info, warn};
use serde_json::{Map, Value};
use std::path::Path;

use super::{find_entries_array, find_value_by_keys, scalar_to_string};
use crate::error::{ErrorContext, PortalError, PortalResult};
use crate::models::{DirectoryRecord, FieldValue};

/// Candidate keys that may contain the list of records
const RECORD_LIST_KEYS: &[&str] = &["records", "items", "universities", "data"];

const TITLE_KEYS: &[&str] = &["title", "name"];
const REGION_KEYS: &[&str] = &["region", "location", "city"];
const TYPE_KEYS: &[&str] = &["type", "kind", "category"];

/// Parse directory records from a JSON file
pub fn parse_records_file(path: &Path) -> PortalResult<Vec<DirectoryRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PortalError::source_with_context(
            format!("Failed to read records file: {}", e),
            ErrorContext::new("read_records").at(path.display().to_string()),
        )
    })?;

    let records = parse_records_str(&content)?;
    info!("Loaded {} directory record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Parse directory records from a JSON string
///
/// Entries without a title are skipped; there is nothing to list them by.
pub fn parse_records_str(json_str: &str) -> PortalResult<Vec<DirectoryRecord>> {
    let value: Value = serde_json::from_str(json_str)
        .map_err(|e| PortalError::from(e).with_operation("parse_records"))?;

    let raw_records = find_entries_array(&value, RECORD_LIST_KEYS).ok_or_else(|| {
        PortalError::parse_with_context(
            "Could not find records array in JSON",
            ErrorContext::new("parse_records"),
        )
    })?;

    let mut records = Vec::with_capacity(raw_records.len());
    for (index, raw) in raw_records.iter().enumerate() {
        match parse_record(raw) {
            Some(record) => records.push(record),
            None => warn!("Skipping directory entry #{} without a title", index + 1),
        }
    }
    Ok(records)
}

fn parse_record(raw: &Value) -> Option<DirectoryRecord> {
    let obj = raw.as_object()?;

    let title = find_value_by_keys(obj, TITLE_KEYS)
        .and_then(scalar_to_string)
        .filter(|t| !t.is_empty())?;

    let mut record = DirectoryRecord::new(title);
    record.region = find_value_by_keys(obj, REGION_KEYS).and_then(parse_field_value);
    record.kind = find_value_by_keys(obj, TYPE_KEYS).and_then(parse_field_value);
    record.extra = passthrough_fields(obj);
    Some(record)
}

/// A facet field: a scalar label or a list of them. Strings are kept as
/// stored since facet filters compare them exactly.
fn parse_field_value(value: &Value) -> Option<FieldValue> {
    match value {
        Value::Array(items) => {
            let labels: Vec<String> = items.iter().filter_map(raw_label).collect();
            Some(FieldValue::Many(labels))
        }
        other => raw_label(other).map(FieldValue::One),
    }
}

fn raw_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        other => scalar_to_string(other),
    }
}

/// Everything that is not one of the recognised keys.
fn passthrough_fields(obj: &Map<String, Value>) -> Map<String, Value> {
    let known = |key: &str| {
        TITLE_KEYS.contains(&key) || REGION_KEYS.contains(&key) || TYPE_KEYS.contains(&key)
    };
    obj.iter()
        .filter(|(key, _)| !known(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
