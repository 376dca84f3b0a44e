//! Clock-time formatting for iRail timestamps.

use std::fmt;

use chrono::{DateTime, Local, TimeZone};

/// Format a Unix timestamp (seconds, as text) as `HH:MM` in `tz`.
///
/// Returns `None` when the text is not an integer or is out of range.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use liveboard_server::view::format_clock;
///
/// assert_eq!(format_clock("1700000000", &Utc).as_deref(), Some("22:13"));
/// assert_eq!(format_clock("soon", &Utc), None);
/// ```
pub fn format_clock<Tz>(timestamp: &str, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let secs: i64 = timestamp.trim().parse().ok()?;
    let utc = DateTime::from_timestamp(secs, 0)?;
    Some(utc.with_timezone(tz).format("%H:%M").to_string())
}

/// Format a Unix timestamp as `HH:MM` in the server's local time zone.
pub fn format_local_clock(timestamp: &str) -> Option<String> {
    format_clock(timestamp, &Local)
}
