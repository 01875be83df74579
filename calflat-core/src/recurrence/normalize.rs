use chrono::{NaiveDateTime, SubsecRound};
use tracing::debug;

use super::{Frequency, RawRule, RecurrenceSpec, WeekdayOccurrence, parse_weekday};
use crate::error::{CalFlatError, CalFlatResult};
use crate::timestamp::parse_timestamp;

/// Turn a raw RRULE field map into a [`RecurrenceSpec`] seeded at `start`.
///
/// FREQ must carry exactly one known value. COUNT, INTERVAL, UNTIL and WKST
/// take their first value; BYDAY entries may carry a signed ordinal. UNTIL is
/// clamped to `now`. Fields outside that set are ignored.
pub fn normalize(
    raw: &RawRule,
    start: NaiveDateTime,
    now: NaiveDateTime,
) -> CalFlatResult<RecurrenceSpec> {
    let malformed = |reason: String| CalFlatError::recurrence(raw.to_string(), reason);

    let frequency = match raw.get("FREQ") {
        Some([value]) => value.parse::<Frequency>().map_err(malformed)?,
        Some(values) => {
            return Err(malformed(format!(
                "expected exactly one FREQ value, found {}",
                values.len()
            )));
        }
        None => return Err(malformed("missing FREQ".to_string())),
    };

    let mut spec = RecurrenceSpec::new(frequency, start);
    let mut ignored = Vec::new();

    for (name, values) in raw.iter() {
        match name.to_ascii_lowercase().as_str() {
            "freq" => {}
            "count" => spec.count = Some(number(name, values).map_err(malformed)?),
            "interval" => spec.interval = Some(number(name, values).map_err(malformed)?),
            "until" => {
                let value = single(name, values).map_err(malformed)?;
                let until = parse_timestamp(value)
                    .ok_or_else(|| malformed(format!("invalid UNTIL '{value}'")))?;
                spec.until = Some(until);
            }
            "wkst" => {
                let value = single(name, values).map_err(malformed)?;
                let day =
                    parse_weekday(value).ok_or_else(|| malformed(format!("invalid WKST '{value}'")))?;
                spec.week_start = Some(day);
            }
            "byday" => {
                let days = values
                    .iter()
                    .map(|entry| parse_weekday_occurrence(entry))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(malformed)?;
                spec.by_weekday = Some(days);
            }
            _ => ignored.push(name.to_ascii_uppercase()),
        }
    }

    if !ignored.is_empty() {
        debug!(rrule = %raw, ?ignored, "ignoring unsupported RRULE fields");
    }

    let now = now.trunc_subsecs(0);
    spec.until = spec.until.map(|until| until.min(now));

    Ok(spec)
}

/// Parse a BYDAY entry: `MO`, `2TU`, `+3WE`, `-1FR`.
pub fn parse_weekday_occurrence(entry: &str) -> Result<WeekdayOccurrence, String> {
    let entry = entry.trim();
    let invalid = || format!("invalid BYDAY entry '{entry}'");

    if entry.len() < 2 || !entry.is_char_boundary(entry.len() - 2) {
        return Err(invalid());
    }

    let (ordinal, code) = entry.split_at(entry.len() - 2);
    let weekday = parse_weekday(code).ok_or_else(invalid)?;

    if ordinal.is_empty() {
        return Ok(WeekdayOccurrence::Every(weekday));
    }

    match ordinal.parse::<i16>() {
        Ok(0) | Err(_) => Err(format!("invalid BYDAY ordinal '{ordinal}' in '{entry}'")),
        Ok(n) => Ok(WeekdayOccurrence::Nth(n, weekday)),
    }
}

fn single<'a>(name: &str, values: &'a [String]) -> Result<&'a str, String> {
    values
        .first()
        .map(String::as_str)
        .ok_or_else(|| format!("{} has no value", name.to_ascii_uppercase()))
}

fn number(name: &str, values: &[String]) -> Result<u32, String> {
    let value = single(name, values)?;
    value.parse::<u32>().map_err(|_| {
        format!(
            "{} '{value}' is not a non-negative integer",
            name.to_ascii_uppercase()
        )
    })
}
