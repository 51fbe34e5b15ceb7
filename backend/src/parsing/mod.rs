//! Parsers for the JSON documents the portal consumes.
//!
//! Upstream calendars and directory exports are not consistent about key
//! names, so both parsers look values up by a list of candidate keys and
//! accept either a wrapped array (`{"windows": [...]}`) or a bare array.
//!
//! - [`schedule_parser`]: fasting-window calendars
//! - [`records_parser`]: university / textbook directory exports
//!
//! # Example
//!
//! ```no_run
//! use eduportal::parsing::schedule_parser::parse_schedule_file;
//! use std::path::Path;
//!
//! let schedule = parse_schedule_file(Path::new("ramadan-2026.json"))
//!     .expect("Failed to parse schedule");
//! println!("{} days", schedule.len());
//! ```

pub mod records_parser;
pub mod schedule_parser;


pub use records_parser::{parse_records_file, parse_records_str};
pub use schedule_parser::{parse_schedule_file, parse_schedule_str};

use serde_json::{Map, Value};

/// Find the list of entries in a payload: the first candidate key holding
/// an array, then any array-valued key, then the payload itself.
pub(crate) fn find_entries_array<'a>(payload: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    if let Some(obj) = payload.as_object() {
        for key in keys {
            if let Some(arr) = obj.get(*key).and_then(Value::as_array) {
                return Some(arr);
            }
        }

        return obj.values().find_map(Value::as_array);
    }

    payload.as_array()
}

/// First value present under any of `keys`.
pub(crate) fn find_value_by_keys<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| obj.get(*key))
}

/// String form of a scalar; `None` for null, arrays and objects.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
