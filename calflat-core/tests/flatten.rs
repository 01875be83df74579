//! Feed-to-output tests over a small but realistic calendar.

use calflat_core::output::{DEFAULT_TABLE, render_insert, write_json_lines};
use calflat_core::{AssembleOptions, ErrorPolicy, flatten};
use chrono::{NaiveDate, NaiveDateTime};

const FEED: &str = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//Example//Team Calendar//EN\r
BEGIN:VTIMEZONE\r
TZID:Europe/Berlin\r
END:VTIMEZONE\r
BEGIN:VEVENT\r
UID:standup@example.com\r
SUMMARY:Standup\r
DTSTART;TZID=Europe/Berlin:20200106T100000\r
DTEND;TZID=Europe/Berlin:20200106T110000\r
CREATED:20191220T090000Z\r
ATTENDEE;CN=Alice:mailto:alice@example.com\r
ATTENDEE;CN=Bob:mailto:bob@example.com\r
RRULE:FREQ=WEEKLY;BYDAY=MO,WE;UNTIL=20200120T000000\r
END:VEVENT\r
BEGIN:VEVENT\r
UID:broken@example.com\r
SUMMARY:Broken\r
DTSTART:20200107T100000\r
RRULE:FREQ=WEEKLY,DAILY\r
END:VEVENT\r
BEGIN:VEVENT\r
UID:review@example.com\r
SUMMARY:Quarterly review\r
DESCRIPTION:Bring numbers\\, please\r
DTSTART:20200110T150000Z\r
END:VEVENT\r
BEGIN:VTODO\r
UID:todo@example.com\r
SUMMARY:Not an event\r
END:VTODO\r
END:VCALENDAR\r
";

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn options() -> AssembleOptions {
    AssembleOptions::new(at(2024, 6, 1, 12)).calendar("Team")
}

#[test]
fn test_feed_is_flattened_in_order() {
    let events = flatten(FEED, &options()).unwrap();

    let summary: Vec<_> = events.iter().map(|e| (e.id.as_str(), e.start)).collect();
    assert_eq!(
        summary,
        vec![
            ("standup@example.com", at(2020, 1, 6, 10)),
            ("standup@example.com", at(2020, 1, 8, 10)),
            ("standup@example.com", at(2020, 1, 13, 10)),
            ("standup@example.com", at(2020, 1, 15, 10)),
            ("standup@example.com", at(2020, 1, 20, 10)),
            ("review@example.com", at(2020, 1, 10, 15)),
        ]
    );

    let standup = &events[0];
    assert_eq!(standup.created, at(2019, 12, 20, 9));
    assert_eq!(standup.attendees.len(), 2);
    assert!(events.iter().all(|e| e.calendar.as_deref() == Some("Team")));

    let review = &events[5];
    assert_eq!(review.end, review.start);
    assert_eq!(review.description, "Bring numbers, please");
}

#[test]
fn test_strict_mode_rejects_the_broken_rule() {
    let result = flatten(FEED, &options().policy(ErrorPolicy::Abort));
    assert!(result.is_err());
}

#[test]
fn test_outputs() {
    let events = flatten(FEED, &options()).unwrap();

    let mut json = Vec::new();
    write_json_lines(&events, &mut json).unwrap();
    let json = String::from_utf8(json).unwrap();
    assert_eq!(json.lines().count(), events.len());
    assert!(json.lines().next().unwrap().contains(r#""start":"2020-01-06 10:00:00""#));

    let sql = render_insert(&events, DEFAULT_TABLE).unwrap();
    assert!(sql.starts_with("insert into google_calendar.events (\"id\",\"calendar\","));
    assert_eq!(sql.matches("::timestamp").count(), events.len() * 3);
    assert!(sql.ends_with(';'));
}
