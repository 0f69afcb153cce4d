use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{ViewError, ViewResult};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Epoch milliseconds for an item timestamp.
///
/// Accepts RFC 3339, naive date-times (taken as UTC), bare dates and integer
/// epoch milliseconds. Anything else is `None`, which sorts earliest.
pub fn parse_timestamp_millis(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(millis) = value.parse::<i64>() {
        return Some(millis);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Parses a user-supplied time bound. On top of the item formats this also
/// understands relative expressions such as "2 hours ago" or "yesterday".
pub fn parse_time_bound(value: &str) -> ViewResult<i64> {
    if let Some(millis) = parse_timestamp_millis(value) {
        return Ok(millis);
    }

    parse_datetime::parse_datetime(value.trim())
        .map(|dt| dt.timestamp_millis())
        .map_err(|_| ViewError::InvalidTimestamp {
            value: value.to_string(),
        })
}
