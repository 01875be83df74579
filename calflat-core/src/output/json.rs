use std::io::Write;

use crate::error::CalFlatResult;
use crate::event::Event;

/// Write one compact JSON object per event, newline separated.
pub fn write_json_lines<W: Write>(events: &[Event], mut writer: W) -> CalFlatResult<()> {
    for event in events {
        serde_json::to_writer(&mut writer, event)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(calendar: Option<&str>) -> Event {
        let start = NaiveDate::from_ymd_opt(2020, 1, 6)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Event {
            id: "evt-1".into(),
            calendar: calendar.map(str::to_string),
            name: "Sync".into(),
            created: start,
            description: String::new(),
            start,
            end: start + chrono::Duration::hours(1),
            attendees: vec!["mailto:a@example.com".into()],
        }
    }

    #[test]
    fn test_json_lines_layout() {
        let mut out = Vec::new();
        write_json_lines(&[event(Some("Team")), event(None)], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"id":"evt-1","calendar":"Team","name":"Sync","created":"2020-01-06 10:00:00","description":"","start":"2020-01-06 10:00:00","end":"2020-01-06 11:00:00","attendees":["mailto:a@example.com"]}"#
        );
        assert!(lines[1].contains(r#""calendar":null"#));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_no_events_writes_nothing() {
        let mut out = Vec::new();
        write_json_lines(&[], &mut out).unwrap();
        assert!(out.is_empty());
    }
}
