use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Milliseconds since 1970-01-01 00:00:00 UTC.
pub type UtcMillis = i64;

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Largest accepted offset, in minutes, on either side of UTC.
pub const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Offset used by the Uzbekistan calendars (UTC+05:00, no DST).
pub const UZBEKISTAN_OFFSET_MINUTES: i32 = 5 * 60;

/// A constant UTC offset standing in for a named timezone.
///
/// Local calendar fields are derived by shifting the UTC instant by the
/// offset and reading UTC fields. That is only correct for zones without
/// daylight-saving transitions; swap this type for a tz-database lookup
/// before using it with a DST-observing zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedOffsetZone {
    offset_minutes: i32,
}

impl FixedOffsetZone {
    /// Create a zone, rejecting offsets beyond ±18 hours.
    pub fn new(offset_minutes: i32) -> Option<Self> {
        if offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return None;
        }
        Some(Self { offset_minutes })
    }

    pub fn utc() -> Self {
        Self { offset_minutes: 0 }
    }

    pub fn uzbekistan() -> Self {
        Self {
            offset_minutes: UZBEKISTAN_OFFSET_MINUTES,
        }
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    pub fn offset_millis(&self) -> i64 {
        i64::from(self.offset_minutes) * MILLIS_PER_MINUTE
    }

    /// Local calendar date of `instant` in this zone.
    pub fn calendar_date(&self, instant: UtcMillis) -> Option<NaiveDate> {
        to_fixed_offset_calendar_date(instant, self.offset_minutes)
    }

    /// UTC instant of the local wall-clock `date` + `time`.
    pub fn instant_of(&self, date: NaiveDate, time: NaiveTime) -> UtcMillis {
        date.and_time(time).and_utc().timestamp_millis() - self.offset_millis()
    }
}

impl Default for FixedOffsetZone {
    fn default() -> Self {
        Self::uzbekistan()
    }
}

/// Shift `instant` by a constant offset and read the UTC calendar date.
///
/// Returns `None` when the shifted instant is outside chrono's range.
pub fn to_fixed_offset_calendar_date(instant: UtcMillis, offset_minutes: i32) -> Option<NaiveDate> {
    let shifted = instant.checked_add(i64::from(offset_minutes) * MILLIS_PER_MINUTE)?;
    DateTime::from_timestamp_millis(shifted).map(|dt| dt.date_naive())
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Parse an `HH:MM` wall-clock time. `HH:MM:SS` is tolerated.
pub fn parse_local_time(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
}
