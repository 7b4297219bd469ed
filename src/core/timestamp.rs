//! Timestamp formatting for log lines
//!
//! Every line carries local time at second precision in a fixed layout,
//! e.g. `2024-01-02 15:04:05`.

use chrono::{DateTime, Local, TimeZone};

/// strftime layout shared by text and JSON output
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Format any zoned datetime with [`TIMESTAMP_LAYOUT`]
#[must_use]
pub fn format_datetime<Tz>(datetime: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    datetime.format(TIMESTAMP_LAYOUT).to_string()
}

/// Current local time formatted for a log line
#[must_use]
pub fn now() -> String {
    format_datetime(&Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, Utc};

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_layout_truncates_to_seconds() {
        assert_eq!(format_datetime(&fixed_datetime()), "2025-01-08 10:30:45");
    }

    #[test]
    fn test_now_matches_layout() {
        let stamp = now();
        assert_eq!(stamp.len(), 19);
        assert!(NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_LAYOUT).is_ok());
    }
}
