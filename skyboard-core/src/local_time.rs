//! DST-naive local time helpers.
//!
//! A "local instant" is the UTC timestamp shifted by the location's fixed
//! offset and then read back as if it were UTC. No zone database is consulted.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::model::TimezoneOffset;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Shift `utc_seconds` by `offset` and return the wall-clock fields.
///
/// Returns `None` when the shifted instant overflows or leaves chrono's
/// supported calendar range.
pub fn local_instant(utc_seconds: i64, offset: TimezoneOffset) -> Option<NaiveDateTime> {
    let shifted = utc_seconds.checked_add(offset.seconds())?;
    DateTime::from_timestamp(shifted, 0).map(|dt| dt.naive_utc())
}

/// Format a local instant as a 12-hour clock label, e.g. `3:05 PM`.
pub fn format_clock(local: &NaiveDateTime) -> String {
    let hour = local.hour();
    let h12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    let suffix = if hour >= 12 { "PM" } else { "AM" };

    format!("{h12}:{:02} {suffix}", local.minute())
}

/// Short English weekday, Sunday-first.
pub fn weekday_label(local: &NaiveDateTime) -> &'static str {
    WEEKDAYS[local.weekday().num_days_from_sunday() as usize]
}

pub fn date_key(local: &NaiveDateTime) -> NaiveDate {
    local.date()
}

/// Convenience: `format_clock(local_instant(..))`.
pub fn format_local_time(utc_seconds: i64, offset: TimezoneOffset) -> Option<String> {
    local_instant(utc_seconds, offset).map(|local| format_clock(&local))
}
