//! Naive timestamp parsing and formatting.
//!
//! Timezone designators are dropped: `20200106T100000Z`, a `TZID`-qualified
//! `20200106T100000` and a floating `20200106T100000` all read as the same
//! wall-clock instant.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serializer;

/// Format used for timestamps in JSON output.
pub const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse an iCalendar DATE or DATE-TIME value into a naive timestamp.
/// DATE values resolve to midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    let value = value.strip_suffix(['Z', 'z']).unwrap_or(value);

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M") {
        return Some(dt);
    }

    NaiveDate::parse_from_str(value, "%Y%m%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Render a timestamp as iCalendar DATE-TIME in UTC form (`YYYYMMDDTHHMMSSZ`).
pub fn to_ics_utc(dt: &NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

pub(crate) fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&dt.format(OUTPUT_FORMAT))
}
