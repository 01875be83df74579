//! Turns a list of calendar components into the flat event list.

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::component::CalendarComponent;
use crate::error::CalFlatResult;
use crate::event::Event;
use crate::extract::extract_event;
use crate::recurrence::{RawRule, expand, normalize};

/// What to do with a component that cannot be turned into events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log the component and carry on with the rest of the calendar.
    #[default]
    Skip,
    /// Stop at the first malformed component.
    Abort,
}

#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Copied into every event's `calendar` field
    pub calendar: Option<String>,
    /// Evaluation instant; nothing at or after it is emitted
    pub now: NaiveDateTime,
    pub policy: ErrorPolicy,
}

impl AssembleOptions {
    pub fn new(now: NaiveDateTime) -> Self {
        AssembleOptions {
            calendar: None,
            now,
            policy: ErrorPolicy::default(),
        }
    }

    pub fn calendar(mut self, name: impl Into<String>) -> Self {
        self.calendar = Some(name.into());
        self
    }

    pub fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Flatten every VEVENT, in component order and then occurrence order.
pub fn assemble(components: &[CalendarComponent], options: &AssembleOptions) -> CalFlatResult<Vec<Event>> {
    let mut events = Vec::new();
    let mut skipped = 0usize;

    for component in components.iter().filter(|c| c.is_kind("VEVENT")) {
        match assemble_component(component, options) {
            Ok(flattened) => events.extend(flattened),
            Err(e) if e.is_component_error() && options.policy == ErrorPolicy::Skip => {
                let uid = component.property("UID").map(|p| p.value.as_str());
                let rrule = component.property("RRULE").map(|p| p.value.as_str());
                warn!(uid, rrule, error = %e, "skipping component");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(events = events.len(), skipped, "flattened calendar");
    Ok(events)
}

/// Events produced by a single VEVENT: the event itself, or one per
/// occurrence when it carries an RRULE.
pub fn assemble_component(component: &CalendarComponent, options: &AssembleOptions) -> CalFlatResult<Vec<Event>> {
    let event = extract_event(component, options.calendar.as_deref())?;

    let Some(rrule) = component.property("RRULE") else {
        return Ok(vec![event]);
    };

    let raw = RawRule::parse(&rrule.value);
    let spec = normalize(&raw, event.start, options.now)?;
    let occurrences = expand(&spec, event.duration(), options.now)?;

    debug!(uid = %event.id, rrule = %rrule.value, occurrences = occurrences.len(), "expanded recurrence");

    Ok(occurrences
        .into_iter()
        .map(|o| event.at_occurrence(o.start, o.end))
        .collect())
}
