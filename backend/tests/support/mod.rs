//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveTime};
use eduportal::models::{DirectoryRecord, FixedOffsetZone, Schedule, UtcMillis};
use eduportal::parsing::{parse_records_file, parse_schedule_file};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily changed (`None` removes).
///
/// Serialized across tests and restored on unwind, so `PORTAL_CONFIG`
/// tests cannot see each other's values.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = EnvRestore::apply(changes);
    f()
}

struct EnvRestore(Vec<(String, Option<String>)>);

impl EnvRestore {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let mut previous: Vec<(String, Option<String>)> = Vec::with_capacity(changes.len());
        for (key, value) in changes {
            if !previous.iter().any(|(k, _)| k.as_str() == *key) {
                previous.push((key.to_string(), std::env::var(key).ok()));
            }
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
        Self(previous)
    }
}

impl Drop for EnvRestore {
    fn drop(&mut self) {
        for (key, value) in self.0.drain(..) {
            match value {
                Some(v) => std::env::set_var(&key, v),
                None => std::env::remove_var(&key),
            }
        }
    }
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// 30-day Tashkent calendar starting 2026-02-19.
pub fn ramadan_schedule() -> Schedule {
    parse_schedule_file(&fixture_path("ramadan_2026_tashkent.json")).unwrap()
}

/// 25 universities; 14 list Tashkent as a region.
pub fn universities() -> Vec<DirectoryRecord> {
    parse_records_file(&fixture_path("universities.json")).unwrap()
}

/// Instant of a Tashkent wall-clock time in 2026.
pub fn tashkent(month: u32, day: u32, hour: u32, minute: u32, second: u32) -> UtcMillis {
    FixedOffsetZone::uzbekistan().instant_of(
        NaiveDate::from_ymd_opt(2026, month, day).unwrap(),
        NaiveTime::from_hms_opt(hour, minute, second).unwrap(),
    )
}
