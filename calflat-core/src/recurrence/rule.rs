//! The raw RRULE field map, before any interpretation.

use std::fmt;

/// `FREQ=WEEKLY;BYDAY=MO,WE` as an ordered map of field name to values.
///
/// Every field is list-valued. Names keep the case they arrived in but are
/// compared case-insensitively, and a repeated field accumulates values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRule {
    fields: Vec<(String, Vec<String>)>,
}

impl RawRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split RRULE text into fields. Parts without `=` are ignored.
    pub fn parse(text: &str) -> Self {
        let mut rule = RawRule::new();

        for part in text.trim().split(';') {
            let Some((name, values)) = part.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let values = values
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            rule.insert(name, values);
        }

        rule
    }

    pub fn insert(&mut self, name: &str, values: Vec<String>) {
        match self
            .fields
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => existing.extend(values),
            None => self.fields.push((name.to_string(), values)),
        }
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, vec![value.to_string()]);
        self
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for RawRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, values)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}={}", name.to_ascii_uppercase(), values.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_fields_and_lists() {
        let rule = RawRule::parse("FREQ=WEEKLY;BYDAY=MO,WE;UNTIL=20200120T000000");

        assert_eq!(rule.get("freq"), Some(&["WEEKLY".to_string()][..]));
        assert_eq!(
            rule.get("BYDAY"),
            Some(&["MO".to_string(), "WE".to_string()][..])
        );
        assert_eq!(rule.get("count"), None);
    }

    #[test]
    fn test_repeated_fields_accumulate() {
        let rule = RawRule::parse("FREQ=WEEKLY;freq=DAILY");
        assert_eq!(
            rule.get("FREQ"),
            Some(&["WEEKLY".to_string(), "DAILY".to_string()][..])
        );
    }

    #[test]
    fn test_parse_ignores_junk_parts() {
        let rule = RawRule::parse("FREQ=DAILY;;GARBAGE;=5");
        assert_eq!(rule.iter().count(), 1);
    }

    #[test]
    fn test_display_upper_cases_names() {
        let rule = RawRule::parse("freq=MONTHLY;byday=2TU,-1FR");
        assert_eq!(rule.to_string(), "FREQ=MONTHLY;BYDAY=2TU,-1FR");
    }
}
