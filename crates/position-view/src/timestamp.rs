//! Parsing and formatting of `dataHora` timestamps.
//!
//! Accepted inputs are RFC 3339 timestamps (`2024-01-02T10:00:00-03:00`),
//! ISO date-times without an offset (`2024-01-02T10:00:00`, `2024-01-02 10:00`)
//! and bare dates (`2024-01-02`). Inputs without an offset are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

const NAIVE_FORMATS: [&str; 4] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Rendered in place of a timestamp that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Parse a timestamp into a UTC date-time.
#[must_use]
pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Milliseconds since the Unix epoch, `None` when unparseable.
#[must_use]
pub fn epoch_millis(value: &str) -> Option<i64> {
    parse(value).map(|dt| dt.timestamp_millis())
}

/// Format as `dd/mm/yyyy, HH:MM:SS` in the given zone.
#[must_use]
pub fn format_local(value: Option<&str>, zone: Tz) -> String {
    value.and_then(parse).map_or_else(
        || INVALID_DATE.to_string(),
        |dt| dt.with_timezone(&zone).format("%d/%m/%Y, %H:%M:%S").to_string(),
    )
}
