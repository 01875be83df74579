//! RRULE expansion for recurring events.
//!
//! Naive timestamps are handed to the `rrule` crate as UTC, so no timezone
//! arithmetic happens anywhere in the pipeline. Every occurrence is bounded by
//! UNTIL (when present) and by the evaluation instant.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use rrule::RRuleSet;

use super::{Frequency, RecurrenceSpec, WeekdayOccurrence};
use crate::error::{CalFlatError, CalFlatResult};
use crate::timestamp::to_ics_utc;

/// One concrete instance of a recurring event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Expand a recurrence into its occurrences strictly before `now`, in
/// chronological order, each lasting `duration`.
pub fn expand(
    spec: &RecurrenceSpec,
    duration: Duration,
    now: NaiveDateTime,
) -> CalFlatResult<Vec<Occurrence>> {
    let bound = match spec.until {
        Some(until) => until_cutoff(until).min(now),
        None => now,
    };

    if bound < spec.dtstart {
        return Ok(Vec::new());
    }

    // RFC 5545 forbids COUNT together with UNTIL; the bound is applied below.
    let rule_until = spec.count.is_none().then_some(bound);
    let rrule_text = to_rrule_text(spec, rule_until);

    let rrule_set = rrule_text.parse::<RRuleSet>().map_err(|e| {
        CalFlatError::recurrence(spec.to_raw_rule().to_string(), e.to_string())
    })?;

    // Guards only against rules that never produce a date.
    let rrule_set = rrule_set.limit();

    (&rrule_set)
        .into_iter()
        .map(|dt| dt.naive_utc())
        .take_while(|start| *start <= bound && *start < now)
        .map(|start| {
            start
                .checked_add_signed(duration)
                .map(|end| Occurrence { start, end })
                .ok_or_else(|| {
                    CalFlatError::recurrence(
                        spec.to_raw_rule().to_string(),
                        format!("occurrence at {start} ends out of range"),
                    )
                })
        })
        .collect()
}

/// A midnight UNTIL (including date-only values) covers that whole day.
fn until_cutoff(until: NaiveDateTime) -> NaiveDateTime {
    if until.time() == NaiveTime::MIN {
        until + Duration::days(1) - Duration::seconds(1)
    } else {
        until
    }
}

/// Build the DTSTART + RRULE text understood by the `rrule` crate.
///
/// Ordinal BYDAY entries only mean something for MONTHLY and YEARLY rules;
/// for DAILY and WEEKLY the ordinal is dropped.
pub fn to_rrule_text(spec: &RecurrenceSpec, until: Option<NaiveDateTime>) -> String {
    let mut parts = vec![format!("FREQ={}", spec.frequency)];

    if let Some(interval) = spec.interval {
        parts.push(format!("INTERVAL={interval}"));
    }
    if let Some(count) = spec.count {
        parts.push(format!("COUNT={count}"));
    }
    if let Some(until) = until {
        parts.push(format!("UNTIL={}", to_ics_utc(&until)));
    }
    if let Some(wkst) = spec.week_start {
        parts.push(format!("WKST={}", super::weekday_code(wkst)));
    }
    if let Some(days) = &spec.by_weekday {
        let keep_ordinals = matches!(spec.frequency, Frequency::Monthly | Frequency::Yearly);
        let mut entries: Vec<String> = Vec::with_capacity(days.len());
        for day in days {
            let entry = match day {
                WeekdayOccurrence::Nth(_, weekday) if !keep_ordinals => {
                    WeekdayOccurrence::Every(*weekday).to_string()
                }
                other => other.to_string(),
            };
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }
        parts.push(format!("BYDAY={}", entries.join(",")));
    }

    format!(
        "DTSTART:{}\nRRULE:{}",
        to_ics_utc(&spec.dtstart),
        parts.join(";")
    )
}
