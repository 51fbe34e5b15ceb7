use crate::models::{UtcMillis, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND};

/// Remaining time until `target`, never negative.
pub fn remaining_millis(target: UtcMillis, now: UtcMillis) -> i64 {
    target.saturating_sub(now).max(0)
}

/// Render a duration as `HH:MM:SS` using floor division.
///
/// Negative durations render as `00:00:00`; hours grow past two digits
/// when needed.
pub fn format_duration(millis: i64) -> String {
    let millis = millis.max(0);
    let hours = millis / MILLIS_PER_HOUR;
    let minutes = (millis % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
    let seconds = (millis % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Countdown text from `now` to `target`.
pub fn format_countdown(target: UtcMillis, now: UtcMillis) -> String {
    format_duration(remaining_millis(target, now))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_zero() {
        assert_eq!(format_duration(0), "00:00:00");
    }

    #[test]
    fn test_floor_not_round() {
        assert_eq!(format_duration(999), "00:00:00");
        assert_eq!(format_duration(59_999), "00:00:59");
        assert_eq!(format_duration(3_599_999), "00:59:59");
    }

    #[test]
    fn test_hours_minutes_seconds() {
        let millis = 5 * MILLIS_PER_HOUR + 7 * MILLIS_PER_MINUTE + 9 * MILLIS_PER_SECOND;
        assert_eq!(format_duration(millis), "05:07:09");
    }

    #[test]
    fn test_long_durations_keep_all_hours() {
        assert_eq!(format_duration(120 * MILLIS_PER_HOUR), "120:00:00");
    }

    #[test]
    fn test_negative_clamps_to_zero() {
        assert_eq!(format_duration(-1), "00:00:00");
        assert_eq!(format_countdown(1_000, 5_000), "00:00:00");
    }

    #[test]
    fn test_remaining_saturates() {
        assert_eq!(remaining_millis(i64::MIN, i64::MAX), 0);
        assert_eq!(remaining_millis(10_000, 4_000), 6_000);
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(90_500, 0), "00:01:30");
    }
}
