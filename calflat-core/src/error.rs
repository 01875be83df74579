//! Error types for calflat.

use thiserror::Error;

/// Errors that can occur while flattening a calendar.
#[derive(Error, Debug)]
pub enum CalFlatError {
    /// A VEVENT lacks one of UID, SUMMARY or DTSTART, or DTSTART is unreadable.
    #[error("Malformed event{}: missing or invalid {field}", uid_suffix(.uid))]
    MalformedEvent {
        uid: Option<String>,
        field: &'static str,
    },

    /// An RRULE that cannot be turned into a recurrence.
    #[error("Malformed RRULE '{rrule}': {reason}")]
    MalformedRecurrence { rrule: String, reason: String },

    #[error("Invalid {field} timestamp '{value}'")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CalFlatError {
    pub(crate) fn recurrence(rrule: impl Into<String>, reason: impl Into<String>) -> Self {
        CalFlatError::MalformedRecurrence {
            rrule: rrule.into(),
            reason: reason.into(),
        }
    }

    /// True for errors scoped to a single calendar component.
    pub fn is_component_error(&self) -> bool {
        matches!(
            self,
            CalFlatError::MalformedEvent { .. }
                | CalFlatError::MalformedRecurrence { .. }
                | CalFlatError::InvalidTimestamp { .. }
        )
    }
}

fn uid_suffix(uid: &Option<String>) -> String {
    uid.as_deref()
        .map(|u| format!(" '{u}'"))
        .unwrap_or_default()
}

impl From<serde_json::Error> for CalFlatError {
    fn from(e: serde_json::Error) -> Self {
        CalFlatError::Serialization(e.to_string())
    }
}

/// Result type alias for calflat operations.
pub type CalFlatResult<T> = Result<T, CalFlatError>;
