//! Builds an [`Event`] from a VEVENT component.

use chrono::{Duration, NaiveDateTime};

use crate::component::{CalendarComponent, FieldValue};
use crate::error::{CalFlatError, CalFlatResult};
use crate::event::Event;
use crate::timestamp::parse_timestamp;

/// Extract the base event record from a VEVENT.
///
/// UID, SUMMARY and DTSTART are mandatory. DTEND falls back to
/// `DTSTART + DURATION` and then to DTSTART; CREATED falls back to DTSTART.
pub fn extract_event(component: &CalendarComponent, calendar: Option<&str>) -> CalFlatResult<Event> {
    let id = component
        .field("UID")
        .and_then(|f| f.first().map(str::to_string))
        .ok_or(CalFlatError::MalformedEvent {
            uid: None,
            field: "UID",
        })?;

    let malformed = |field: &'static str| CalFlatError::MalformedEvent {
        uid: Some(id.clone()),
        field,
    };

    let name = component.text("SUMMARY").ok_or_else(|| malformed("SUMMARY"))?;

    let start = component
        .property("DTSTART")
        .and_then(|p| parse_timestamp(&p.value))
        .ok_or_else(|| malformed("DTSTART"))?;

    let created = optional_timestamp(component, "CREATED")?.unwrap_or(start);

    let end = match optional_timestamp(component, "DTEND")? {
        Some(end) => end,
        None => match component.property("DURATION") {
            Some(p) => start
                .checked_add_signed(parse_duration(&p.value)?)
                .ok_or_else(|| CalFlatError::InvalidTimestamp {
                    field: "DURATION",
                    value: p.value.clone(),
                })?,
            None => start,
        },
    };

    let description = component.text("DESCRIPTION").unwrap_or_default();

    let attendees = component
        .field("ATTENDEE")
        .map(FieldValue::into_list)
        .unwrap_or_default();

    Ok(Event {
        id,
        calendar: calendar.map(str::to_string),
        name,
        created,
        description,
        start,
        end,
        attendees,
    })
}

fn optional_timestamp(
    component: &CalendarComponent,
    field: &'static str,
) -> CalFlatResult<Option<NaiveDateTime>> {
    let Some(prop) = component.property(field) else {
        return Ok(None);
    };

    parse_timestamp(&prop.value)
        .map(Some)
        .ok_or_else(|| CalFlatError::InvalidTimestamp {
            field,
            value: prop.value.clone(),
        })
}

/// Parse a DURATION value (`PT1H30M`, `-P1D`, `P2W`).
fn parse_duration(value: &str) -> CalFlatResult<Duration> {
    let invalid = || CalFlatError::InvalidTimestamp {
        field: "DURATION",
        value: value.to_string(),
    };

    let trimmed = value.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let parsed = iso8601::duration(unsigned).map_err(|_| invalid())?;
    let std_duration: std::time::Duration = parsed.into();
    let duration = Duration::from_std(std_duration).map_err(|_| invalid())?;

    Ok(if negative { -duration } else { duration })
}
