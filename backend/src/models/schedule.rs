//! Day-by-day window calendar.
//!
//! A [`Schedule`] keeps the windows exactly as supplied (dates and times
//! as strings) next to their parsed form. Windows whose date or times do
//! not parse stay in the list, so day numbers keep their positions, but
//! they never take part in phase resolution.

use chrono::{NaiveDate, NaiveTime};
use log::warn;
use serde::{Deserialize, Serialize};

use super::time::{parse_calendar_date, parse_local_time, FixedOffsetZone, UtcMillis};

/// One day's window, as written in the source calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    /// `YYYY-MM-DD` in the schedule's fixed offset
    pub date: String,
    /// `HH:MM` local opening time
    pub window_start: String,
    /// `HH:MM` local closing time
    pub window_end: String,
}

impl Window {
    pub fn new(
        date: impl Into<String>,
        window_start: impl Into<String>,
        window_end: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            window_start: window_start.into(),
            window_end: window_end.into(),
        }
    }

    /// Parse date and times; `None` if any of them is malformed.
    pub fn parse(&self) -> Option<ParsedWindow> {
        Some(ParsedWindow {
            date: parse_calendar_date(&self.date)?,
            start: parse_local_time(&self.window_start)?,
            end: parse_local_time(&self.window_end)?,
        })
    }
}

/// A window with its fields parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedWindow {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ParsedWindow {
    pub fn start_instant(&self, zone: &FixedOffsetZone) -> UtcMillis {
        zone.instant_of(self.date, self.start)
    }

    pub fn end_instant(&self, zone: &FixedOffsetZone) -> UtcMillis {
        zone.instant_of(self.date, self.end)
    }
}

/// A well-formed window together with its position in the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleEntry<'a> {
    /// 0-based position in the schedule, malformed windows included
    pub index: usize,
    pub window: &'a Window,
    pub parsed: ParsedWindow,
}

impl ScheduleEntry<'_> {
    /// 1-based day number shown on the banner.
    pub fn day_number(&self) -> usize {
        self.index + 1
    }
}

/// Ordered calendar of windows, expected to be strictly increasing by date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    windows: Vec<Window>,
    parsed: Vec<Option<ParsedWindow>>,
}

impl Schedule {
    pub fn new(windows: Vec<Window>) -> Self {
        let parsed: Vec<Option<ParsedWindow>> = windows
            .iter()
            .enumerate()
            .map(|(index, window)| {
                let parsed = window.parse();
                if parsed.is_none() {
                    warn!(
                        "Ignoring malformed schedule window #{} (date={:?}, start={:?}, end={:?})",
                        index + 1,
                        window.date,
                        window.window_start,
                        window.window_end
                    );
                }
                parsed
            })
            .collect();

        Self { windows, parsed }
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Number of windows excluded from resolution.
    pub fn malformed_count(&self) -> usize {
        self.parsed.iter().filter(|p| p.is_none()).count()
    }

    /// Well-formed windows in schedule order.
    pub fn entries(&self) -> impl Iterator<Item = ScheduleEntry<'_>> + '_ {
        self.windows
            .iter()
            .zip(self.parsed.iter())
            .enumerate()
            .filter_map(|(index, (window, parsed))| {
                parsed.map(|parsed| ScheduleEntry {
                    index,
                    window,
                    parsed,
                })
            })
    }

    pub fn first_entry(&self) -> Option<ScheduleEntry<'_>> {
        self.entries().next()
    }

    pub fn last_entry(&self) -> Option<ScheduleEntry<'_>> {
        self.entries().last()
    }

    /// Linear scan for the window dated `date`.
    pub fn entry_for_date(&self, date: NaiveDate) -> Option<ScheduleEntry<'_>> {
        self.entries().find(|entry| entry.parsed.date == date)
    }

    /// First well-formed window after position `index`.
    pub fn next_entry_after(&self, index: usize) -> Option<ScheduleEntry<'_>> {
        self.entries().find(|entry| entry.index > index)
    }

    /// Whether the well-formed windows are strictly increasing by date.
    pub fn is_strictly_increasing(&self) -> bool {
        let dates: Vec<NaiveDate> = self.entries().map(|e| e.parsed.date).collect();
        dates.windows(2).all(|pair| pair[0] < pair[1])
    }
}

impl From<Vec<Window>> for Schedule {
    fn from(windows: Vec<Window>) -> Self {
        Schedule::new(windows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Schedule {
        Schedule::new(vec![
            Window::new("2026-02-19", "05:54", "18:05"),
            Window::new("2026-02-20", "5:53am", "18:07"),
            Window::new("2026-02-21", "05:51", "18:08"),
        ])
    }

    #[test]
    fn test_malformed_windows_are_skipped() {
        let schedule = sample();
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule.malformed_count(), 1);

        let indices: Vec<usize> = schedule.entries().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_day_number_keeps_position() {
        let schedule = sample();
        let last = schedule.last_entry().unwrap();
        assert_eq!(last.day_number(), 3);
        assert_eq!(last.window.date, "2026-02-21");
    }

    #[test]
    fn test_entry_for_date() {
        let schedule = sample();
        let date = NaiveDate::from_ymd_opt(2026, 2, 19).unwrap();
        assert_eq!(schedule.entry_for_date(date).unwrap().index, 0);

        let malformed_day = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        assert!(schedule.entry_for_date(malformed_day).is_none());
    }

    #[test]
    fn test_next_entry_skips_malformed() {
        let schedule = sample();
        assert_eq!(schedule.next_entry_after(0).unwrap().index, 2);
        assert!(schedule.next_entry_after(2).is_none());
    }

    #[test]
    fn test_strictly_increasing() {
        assert!(sample().is_strictly_increasing());

        let unordered = Schedule::new(vec![
            Window::new("2026-02-20", "05:53", "18:07"),
            Window::new("2026-02-19", "05:54", "18:05"),
        ]);
        assert!(!unordered.is_strictly_increasing());
    }

    #[test]
    fn test_window_serde_camel_case() {
        let window: Window = serde_json::from_str(
            r#"{"date": "2026-02-19", "windowStart": "05:54", "windowEnd": "18:05"}"#,
        )
        .unwrap();
        assert_eq!(window, Window::new("2026-02-19", "05:54", "18:05"));
    }

    #[test]
    fn test_empty_schedule() {
        let schedule = Schedule::default();
        assert!(schedule.is_empty());
        assert!(schedule.first_entry().is_none());
        assert!(schedule.last_entry().is_none());
    }
}
