//! RRULE normalization and expansion.
//!
//! A raw RRULE field map ([`RawRule`]) is normalized into a
//! [`RecurrenceSpec`], which is then expanded into concrete occurrences
//! bounded by the evaluation instant.

mod expand;
mod normalize;
mod rule;

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Weekday};

pub use expand::{Occurrence, expand, to_rrule_text};
pub use normalize::{normalize, parse_weekday_occurrence};
pub use rule::RawRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Frequency::Daily),
            "WEEKLY" => Ok(Frequency::Weekly),
            "MONTHLY" => Ok(Frequency::Monthly),
            "YEARLY" => Ok(Frequency::Yearly),
            other => Err(format!("unsupported FREQ '{other}'")),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-letter iCalendar weekday code (`MO`..`SU`).
pub fn parse_weekday(code: &str) -> Option<Weekday> {
    match code.to_ascii_uppercase().as_str() {
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        "SU" => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// A BYDAY entry: every such weekday in the period, or the nth one
/// (negative counts from the end, `-1` is "last").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeekdayOccurrence {
    Every(Weekday),
    Nth(i16, Weekday),
}

impl WeekdayOccurrence {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekdayOccurrence::Every(day) | WeekdayOccurrence::Nth(_, day) => *day,
        }
    }

    pub fn ordinal(&self) -> Option<i16> {
        match self {
            WeekdayOccurrence::Every(_) => None,
            WeekdayOccurrence::Nth(n, _) => Some(*n),
        }
    }
}

impl fmt::Display for WeekdayOccurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekdayOccurrence::Every(day) => f.write_str(weekday_code(*day)),
            WeekdayOccurrence::Nth(n, day) => write!(f, "{}{}", n, weekday_code(*day)),
        }
    }
}

/// A canonical recurrence rule attached to its event's start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceSpec {
    pub frequency: Frequency,
    pub interval: Option<u32>,
    pub count: Option<u32>,
    /// Inclusive, already clamped to the evaluation instant
    pub until: Option<NaiveDateTime>,
    pub week_start: Option<Weekday>,
    pub by_weekday: Option<Vec<WeekdayOccurrence>>,
    pub dtstart: NaiveDateTime,
}

impl RecurrenceSpec {
    pub fn new(frequency: Frequency, dtstart: NaiveDateTime) -> Self {
        RecurrenceSpec {
            frequency,
            interval: None,
            count: None,
            until: None,
            week_start: None,
            by_weekday: None,
            dtstart,
        }
    }

    /// Render back into the field map form accepted by [`normalize`].
    pub fn to_raw_rule(&self) -> RawRule {
        let mut rule = RawRule::new().with("FREQ", self.frequency.as_str());

        if let Some(interval) = self.interval {
            rule = rule.with("INTERVAL", &interval.to_string());
        }
        if let Some(count) = self.count {
            rule = rule.with("COUNT", &count.to_string());
        }
        if let Some(until) = self.until {
            rule = rule.with("UNTIL", &until.format("%Y%m%dT%H%M%S").to_string());
        }
        if let Some(wkst) = self.week_start {
            rule = rule.with("WKST", weekday_code(wkst));
        }
        if let Some(days) = &self.by_weekday {
            rule.insert("BYDAY", days.iter().map(ToString::to_string).collect());
        }

        rule
    }
}
