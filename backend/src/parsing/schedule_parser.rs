use log::{debug, info};
use serde_json::Value;
use std::path::Path;

use super::{find_entries_array, find_value_by_keys, scalar_to_string};
use crate::error::{ErrorContext, PortalError, PortalResult};
use crate::models::{Schedule, Window};

/// Candidate keys that may contain the list of windows
const WINDOW_LIST_KEYS: &[&str] = &["windows", "schedule", "days", "calendar"];

/// Candidate keys for the calendar date of a window
const DATE_KEYS: &[&str] = &["date", "day"];

/// Candidate keys for the opening time
const START_KEYS: &[&str] = &["windowStart", "window_start", "start", "suhoor", "sahar"];

/// Candidate keys for the closing time
const END_KEYS: &[&str] = &["windowEnd", "window_end", "end", "iftar"];

/// Parse a schedule from a JSON file
pub fn parse_schedule_file(path: &Path) -> PortalResult<Schedule> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PortalError::source_with_context(
            format!("Failed to read schedule file: {}", e),
            ErrorContext::new("read_schedule").at(path.display().to_string()),
        )
    })?;

    let schedule = parse_schedule_str(&content)?;
    info!(
        "Loaded {} schedule window(s) from {} ({} malformed)",
        schedule.len(),
        path.display(),
        schedule.malformed_count()
    );
    Ok(schedule)
}

/// Parse a schedule from a JSON string
///
/// Entries that are neither objects nor arrays, or that miss a field, are
/// kept as malformed windows so later days keep their day numbers.
pub fn parse_schedule_str(json_str: &str) -> PortalResult<Schedule> {
    let value: Value = serde_json::from_str(json_str).map_err(|e| {
        PortalError::from(e).with_operation("parse_schedule")
    })?;

    let raw_windows = find_entries_array(&value, WINDOW_LIST_KEYS).ok_or_else(|| {
        PortalError::parse_with_context(
            "Could not find schedule windows array in JSON",
            ErrorContext::new("parse_schedule"),
        )
    })?;

    let windows: Vec<Window> = raw_windows.iter().map(parse_window).collect();
    debug!("Parsed {} raw schedule entries", windows.len());
    Ok(Schedule::new(windows))
}

/// Parse one entry; missing fields become empty strings.
fn parse_window(entry: &Value) -> Window {
    if let Some(obj) = entry.as_object() {
        // Object format: {"date": ..., "windowStart": ..., "windowEnd": ...}
        let field = |keys: &[&str]| {
            find_value_by_keys(obj, keys)
                .and_then(scalar_to_string)
                .unwrap_or_default()
        };
        return Window::new(field(DATE_KEYS), field(START_KEYS), field(END_KEYS));
    }

    if let Some(arr) = entry.as_array() {
        // Array format: [date, start, end]
        let field = |i: usize| arr.get(i).and_then(scalar_to_string).unwrap_or_default();
        return Window::new(field(0), field(1), field(2));
    }

    Window::new("", "", "")
}
