//! The flat event record emitted for every (occurrence of an) event.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::timestamp;

/// A calendar event, or one occurrence of a recurring event.
///
/// Field order is the column order of both output formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// UID, verbatim from the source component
    pub id: String,
    /// Name of the source calendar, when the caller supplied one
    pub calendar: Option<String>,
    /// SUMMARY
    pub name: String,
    /// CREATED, falling back to DTSTART
    #[serde(serialize_with = "timestamp::serialize")]
    pub created: NaiveDateTime,
    /// DESCRIPTION, empty when absent
    pub description: String,
    #[serde(serialize_with = "timestamp::serialize")]
    pub start: NaiveDateTime,
    /// DTEND, falling back to DTSTART
    #[serde(serialize_with = "timestamp::serialize")]
    pub end: NaiveDateTime,
    /// ATTENDEE values (usually `mailto:` URIs)
    pub attendees: Vec<String>,
}

impl Event {
    /// `end - start`. Not guaranteed to be positive.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Copy of this event moved to another occurrence.
    pub fn at_occurrence(&self, start: NaiveDateTime, end: NaiveDateTime) -> Event {
        Event {
            start,
            end,
            ..self.clone()
        }
    }
}
