//! Owned view of parsed iCalendar components.
//!
//! The `icalendar` crate's parser borrows from the unfolded input, so each
//! top-level component is copied into a [`CalendarComponent`] that the rest
//! of the pipeline can hold on to.

use icalendar::parser::{self, read_calendar, unfold};

use crate::error::{CalFlatError, CalFlatResult};

/// A field value as it comes out of a component: properties that appear once
/// are scalars, repeated properties (ATTENDEE, EXDATE, ...) are sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    Sequence(Vec<String>),
}

impl FieldValue {
    /// Normalise both shapes into a list.
    pub fn into_list(self) -> Vec<String> {
        match self {
            FieldValue::Scalar(value) => vec![value],
            FieldValue::Sequence(values) => values,
        }
    }

    pub fn first(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(value) => Some(value),
            FieldValue::Sequence(values) => values.first().map(String::as_str),
        }
    }
}

/// A single content line: `NAME;PARAM=value:VALUE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub params: Vec<(String, Option<String>)>,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Property {
            name: name.into(),
            params: Vec::new(),
            value: value.into(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), Some(value.into())));
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .and_then(|(_, v)| v.as_deref())
    }

    /// The serialized value, exactly as it appeared after the colon.
    pub fn to_textual(&self) -> String {
        self.value.clone()
    }
}

impl From<&parser::Property<'_>> for Property {
    fn from(prop: &parser::Property<'_>) -> Self {
        Property {
            name: prop.name.to_string(),
            params: prop
                .params
                .iter()
                .map(|p| (p.key.to_string(), p.val.as_ref().map(|v| v.to_string())))
                .collect(),
            value: prop.val.to_string(),
        }
    }
}

/// A calendar component such as VEVENT, VTODO or VTIMEZONE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarComponent {
    pub kind: String,
    pub properties: Vec<Property>,
}

impl CalendarComponent {
    pub fn new(kind: impl Into<String>) -> Self {
        CalendarComponent {
            kind: kind.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Shorthand for `with_property(Property::new(name, value))`.
    pub fn with(self, name: &str, value: &str) -> Self {
        self.with_property(Property::new(name, value))
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.eq_ignore_ascii_case(kind)
    }

    /// All properties with the given name, in document order.
    pub fn properties_named<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Property> + use<'a, 'n> {
        self.properties
            .iter()
            .filter(move |p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Field lookup by case-insensitive name.
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        let mut values: Vec<String> = self
            .properties_named(name)
            .map(Property::to_textual)
            .collect();

        match values.len() {
            0 => None,
            1 => values.pop().map(FieldValue::Scalar),
            _ => Some(FieldValue::Sequence(values)),
        }
    }

    /// First value of a TEXT field with RFC 5545 escapes resolved.
    pub fn text(&self, name: &str) -> Option<String> {
        self.property(name).map(|p| unescape_text(&p.value))
    }
}

impl From<&parser::Component<'_>> for CalendarComponent {
    fn from(component: &parser::Component<'_>) -> Self {
        CalendarComponent {
            kind: component.name.to_string(),
            properties: component.properties.iter().map(Property::from).collect(),
        }
    }
}

/// Parse an iCalendar document into its top-level components.
pub fn parse_calendar(content: &str) -> CalFlatResult<Vec<CalendarComponent>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| CalFlatError::IcsParse(e.to_string()))?;

    Ok(calendar
        .components
        .iter()
        .map(CalendarComponent::from)
        .collect())
}

/// Resolve TEXT escapes: `\n`/`\N`, `\,`, `\;` and `\\`.
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:abc-123\r\n\
SUMMARY:Standup\\, daily\r\n\
DTSTART;TZID=Europe/Berlin:20200106T100000\r\n\
ATTENDEE;CN=Alice:mailto:alice@example.com\r\n\
ATTENDEE;CN=Bob:mailto:bob@example.com\r\n\
DESCRIPTION:Line one\\nline \r\n two\r\n\
END:VEVENT\r\n\
BEGIN:VTODO\r\n\
UID:todo-1\r\n\
END:VTODO\r\n\
END:VCALENDAR";

    #[test]
    fn test_parse_calendar_keeps_component_order() {
        let components = parse_calendar(FEED).unwrap();
        let kinds: Vec<_> = components.iter().map(|c| c.kind.as_str()).collect();
        assert_eq!(kinds, vec!["VEVENT", "VTODO"]);
    }

    #[test]
    fn test_field_shapes() {
        let components = parse_calendar(FEED).unwrap();
        let event = &components[0];

        assert_eq!(event.field("uid"), Some(FieldValue::Scalar("abc-123".into())));
        assert_eq!(
            event.field("ATTENDEE"),
            Some(FieldValue::Sequence(vec![
                "mailto:alice@example.com".into(),
                "mailto:bob@example.com".into(),
            ]))
        );
        assert_eq!(event.field("LOCATION"), None);
        assert_eq!(event.property("DTSTART").unwrap().param("tzid"), Some("Europe/Berlin"));
    }

    #[test]
    fn test_text_fields_are_unescaped_and_unfolded() {
        let components = parse_calendar(FEED).unwrap();
        let event = &components[0];

        assert_eq!(event.text("SUMMARY").as_deref(), Some("Standup, daily"));
        assert_eq!(event.text("DESCRIPTION").as_deref(), Some("Line one\nline two"));
    }

    #[test]
    fn test_lookup_outlives_the_name() {
        let component = CalendarComponent::new("VEVENT")
            .with("UID", "evt-1")
            .with("ATTENDEE", "mailto:a@example.com")
            .with("attendee", "mailto:b@example.com");

        let uid = {
            let name = String::from("uid");
            component.property(&name)
        };
        assert_eq!(uid.map(|p| p.value.as_str()), Some("evt-1"));

        let attendees: Vec<&str> = component
            .properties_named("Attendee")
            .map(|p| p.value.as_str())
            .collect();
        assert_eq!(attendees, vec!["mailto:a@example.com", "mailto:b@example.com"]);
    }

    #[test]
    fn test_into_list_normalises_scalars() {
        assert_eq!(FieldValue::Scalar("a".into()).into_list(), vec!["a".to_string()]);
        assert_eq!(
            FieldValue::Sequence(vec!["a".into(), "b".into()]).into_list(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_unescape_text() {
        assert_eq!(unescape_text(r"a\;b\\c\Nd"), "a;b\\c\nd");
        assert_eq!(unescape_text("trailing\\"), "trailing\\");
    }
}
