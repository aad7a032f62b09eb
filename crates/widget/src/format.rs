//! Time formatting for the panel.

use chrono::{DateTime, Duration, FixedOffset, Utc};

/// 24-hour `HH:MM:SS` in the given offset, zero-padded.
pub fn clock_time(time: DateTime<Utc>, offset: &FixedOffset) -> String {
    time.with_timezone(offset).format("%H:%M:%S").to_string()
}

/// Elapsed session time as `MMm SSs`, or `Hh MMm SSs` past the hour.
pub fn elapsed(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else {
        format!("{minutes:02}m {seconds:02}s")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_clock_time_zero_padded_24h() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 7, 5, 9).unwrap();
        assert_eq!(clock_time(t, &utc), "07:05:09");

        let t = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 0).unwrap();
        assert_eq!(clock_time(t, &utc), "23:59:00");
    }

    #[test]
    fn test_clock_time_applies_offset() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 23, 30, 0).unwrap();
        assert_eq!(clock_time(t, &plus_two), "01:30:00");
    }

    #[test]
    fn test_elapsed() {
        assert_eq!(elapsed(Duration::seconds(0)), "00m 00s");
        assert_eq!(elapsed(Duration::seconds(65)), "01m 05s");
        assert_eq!(elapsed(Duration::seconds(3_725)), "1h 02m 05s");
        assert_eq!(elapsed(Duration::seconds(-4)), "00m 00s");
    }
}
