//! Flattens an iCalendar feed into a list of event records.
//!
//! - `component` reads the feed into owned components
//! - `extract` builds the base [`Event`] of a VEVENT
//! - `recurrence` normalizes and expands RRULEs
//! - `assemble` ties these together into one ordered event list
//! - `output` writes the list as JSON lines or SQL

pub mod assemble;
pub mod component;
pub mod error;
pub mod event;
pub mod extract;
pub mod output;
pub mod recurrence;
pub mod timestamp;

pub use assemble::{AssembleOptions, ErrorPolicy, assemble};
pub use component::{CalendarComponent, FieldValue, Property, parse_calendar};
pub use error::{CalFlatError, CalFlatResult};
pub use event::Event;
pub use output::{OutputFormat, SqlOptions};

/// Parse `content` and flatten its events in one go.
pub fn flatten(content: &str, options: &AssembleOptions) -> CalFlatResult<Vec<Event>> {
    let components = parse_calendar(content)?;
    assemble(&components, options)
}
