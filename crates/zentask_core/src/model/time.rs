//! Timestamp helpers shared by the model and SQLite mapping.
//!
//! Storage keeps epoch milliseconds; the wire uses RFC 3339 UTC.

use chrono::{DateTime, NaiveDate, Utc};

/// Current time truncated to millisecond precision.
pub fn now_millis() -> DateTime<Utc> {
    truncate_to_millis(Utc::now())
}

/// Drops sub-millisecond precision so values survive a storage round-trip.
pub fn truncate_to_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    from_epoch_millis(value.timestamp_millis()).unwrap_or(value)
}

pub fn to_epoch_millis(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Parses an RFC 3339 timestamp, or a `YYYY-MM-DD` date taken as midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(truncate_to_millis(parsed.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
