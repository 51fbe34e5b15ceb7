//! Time-window phase calculator.
//!
//! Given a [`Schedule`] in a fixed UTC offset and the current instant,
//! works out where "now" sits relative to the calendar and which future
//! boundary the countdown banner should count towards.
//!
//! Resolution is total: every input yields a [`BannerDecision`], either a
//! [`BannerState`] to render or the reason the banner stays hidden.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{FixedOffsetZone, Schedule, ScheduleEntry, UtcMillis};

/// Position of "now" relative to the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Today is before the first scheduled day.
    BeforePeriod,
    /// Today has a window that has not opened yet.
    BeforeWindowOpen,
    /// Today's window is open.
    InsideWindow,
    /// Today's window has closed and another day follows.
    AfterWindowClose,
    /// The last window is behind us.
    PeriodOver,
}

/// Banner texts, one per kind of boundary being counted down to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerLabels {
    /// Shown before the first day of the period
    pub until_period: String,
    /// Shown while waiting for a window to open ("before" label)
    pub until_window_open: String,
    /// Shown while a window is open ("during" label)
    pub until_window_close: String,
}

impl Default for BannerLabels {
    fn default() -> Self {
        Self {
            until_period: "Until Ramadan begins".to_string(),
            until_window_open: "Until suhoor ends".to_string(),
            until_window_close: "Until iftar".to_string(),
        }
    }
}

/// Everything the banner renders for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerState {
    pub label: String,
    /// Next boundary; always later than the `now` it was computed for
    pub target_timestamp: UtcMillis,
    pub phase: Phase,
    /// 1-based day of the matched window, `None` before the period
    pub day_number: Option<usize>,
    pub window_start: Option<String>,
    pub window_end: Option<String>,
}

/// Why no banner is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
    /// No well-formed window in the schedule.
    EmptySchedule,
    /// `now` cannot be mapped onto a calendar date.
    ClockOutOfRange,
    /// Today is after the last scheduled day.
    PeriodOver,
    /// Today is inside the period but has no (well-formed) window.
    NoWindowToday,
    /// The final window of the period has closed.
    FinalWindowClosed,
    /// The following window does not start in the future (unordered schedule).
    ScheduleOutOfOrder,
    /// The viewer hid the banner and the hide period has not expired.
    Dismissed,
}

impl SuppressReason {
    /// Phase implied by the reason, when there is one.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            SuppressReason::PeriodOver | SuppressReason::FinalWindowClosed => {
                Some(Phase::PeriodOver)
            }
            _ => None,
        }
    }
}

/// Outcome of one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "detail", rename_all = "snake_case")]
pub enum BannerDecision {
    Render(BannerState),
    Suppress(SuppressReason),
}

impl BannerDecision {
    pub fn is_visible(&self) -> bool {
        matches!(self, BannerDecision::Render(_))
    }

    pub fn state(&self) -> Option<&BannerState> {
        match self {
            BannerDecision::Render(state) => Some(state),
            BannerDecision::Suppress(_) => None,
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            BannerDecision::Render(state) => Some(state.phase),
            BannerDecision::Suppress(reason) => reason.phase(),
        }
    }
}

/// Resolve the banner for `now`.
pub fn resolve_banner(
    schedule: &Schedule,
    zone: &FixedOffsetZone,
    labels: &BannerLabels,
    now: UtcMillis,
) -> BannerDecision {
    let (Some(first), Some(last)) = (schedule.first_entry(), schedule.last_entry()) else {
        return BannerDecision::Suppress(SuppressReason::EmptySchedule);
    };

    let Some(today) = zone.calendar_date(now) else {
        return BannerDecision::Suppress(SuppressReason::ClockOutOfRange);
    };

    if today < first.parsed.date {
        return BannerDecision::Render(BannerState {
            label: labels.until_period.clone(),
            target_timestamp: first.parsed.start_instant(zone),
            phase: Phase::BeforePeriod,
            day_number: None,
            window_start: None,
            window_end: None,
        });
    }

    if today > last.parsed.date {
        return BannerDecision::Suppress(SuppressReason::PeriodOver);
    }

    let Some(entry) = schedule.entry_for_date(today) else {
        debug!("No schedule window for {}", today);
        return BannerDecision::Suppress(SuppressReason::NoWindowToday);
    };

    let window_start = entry.parsed.start_instant(zone);
    let window_end = entry.parsed.end_instant(zone);

    if now < window_start {
        return BannerDecision::Render(state_for(
            &entry,
            Phase::BeforeWindowOpen,
            &labels.until_window_open,
            window_start,
        ));
    }

    if now < window_end {
        return BannerDecision::Render(state_for(
            &entry,
            Phase::InsideWindow,
            &labels.until_window_close,
            window_end,
        ));
    }

    // The day number stays on the completed window rather than the next one.
    match schedule.next_entry_after(entry.index) {
        Some(next) => {
            let target = next.parsed.start_instant(zone);
            if target <= now {
                debug!(
                    "Window #{} starts at {} which is not after now={}",
                    next.day_number(),
                    target,
                    now
                );
                return BannerDecision::Suppress(SuppressReason::ScheduleOutOfOrder);
            }
            BannerDecision::Render(state_for(
                &entry,
                Phase::AfterWindowClose,
                &labels.until_window_open,
                target,
            ))
        }
        None => BannerDecision::Suppress(SuppressReason::FinalWindowClosed),
    }
}

fn state_for(entry: &ScheduleEntry<'_>, phase: Phase, label: &str, target: UtcMillis) -> BannerState {
    BannerState {
        label: label.to_string(),
        target_timestamp: target,
        phase,
        day_number: Some(entry.day_number()),
        window_start: Some(entry.window.window_start.clone()),
        window_end: Some(entry.window.window_end.clone()),
    }
}
