//! Renders events as a PostgreSQL multi-row INSERT.

use std::io::Write;

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::warn;

use crate::error::CalFlatResult;
use crate::event::Event;
use crate::timestamp::OUTPUT_FORMAT;

pub const DEFAULT_TABLE: &str = "google_calendar.events";

/// Column names, in [`Event`] field order.
pub const COLUMNS: [&str; 8] = [
    "id",
    "calendar",
    "name",
    "created",
    "description",
    "start",
    "end",
    "attendees",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SqlOptions {
    /// Target table, optionally schema-qualified
    pub table: String,
    /// Prefix the INSERT with schema and table DDL
    pub create_table: bool,
}

impl Default for SqlOptions {
    fn default() -> Self {
        SqlOptions {
            table: DEFAULT_TABLE.to_string(),
            create_table: false,
        }
    }
}

enum SqlValue<'a> {
    Text(&'a str),
    OptionalText(Option<&'a str>),
    Timestamp(&'a NaiveDateTime),
    TextArray(&'a [String]),
}

impl SqlValue<'_> {
    fn render(&self) -> String {
        match self {
            SqlValue::Text(s) | SqlValue::OptionalText(Some(s)) if !s.is_empty() => {
                format!("E'{}'", escape_text(s))
            }
            SqlValue::Text(_) | SqlValue::OptionalText(_) => "null".to_string(),
            SqlValue::Timestamp(dt) => format!("'{}'::timestamp", dt.format(OUTPUT_FORMAT)),
            SqlValue::TextArray(values) if values.is_empty() => "null".to_string(),
            SqlValue::TextArray(values) => {
                let elements: Vec<String> = values.iter().map(|v| escape_array_element(v)).collect();
                format!("'{{\"{}\"}}'", elements.join("\", \""))
            }
        }
    }
}

fn row(event: &Event) -> [SqlValue<'_>; 8] {
    [
        SqlValue::Text(&event.id),
        SqlValue::OptionalText(event.calendar.as_deref()),
        SqlValue::Text(&event.name),
        SqlValue::Timestamp(&event.created),
        SqlValue::Text(&event.description),
        SqlValue::Timestamp(&event.start),
        SqlValue::Timestamp(&event.end),
        SqlValue::TextArray(&event.attendees),
    ]
}

/// Single quotes become double quotes, backslashes are doubled and non-ASCII
/// characters become `?`.
fn escape_text(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '\'' => "\"".to_string(),
            '\\' => "\\\\".to_string(),
            c if !c.is_ascii() => "?".to_string(),
            c => c.to_string(),
        })
        .collect()
}

/// Quoting for an element of a `'{"a", "b"}'` array literal.
fn escape_array_element(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '"' => "\\\"".to_string(),
            '\\' => "\\\\".to_string(),
            '\'' => "''".to_string(),
            c if !c.is_ascii() => "?".to_string(),
            c => c.to_string(),
        })
        .collect()
}

/// The INSERT statement, or `None` when there is nothing to insert.
pub fn render_insert(events: &[Event], table: &str) -> Option<String> {
    if events.is_empty() {
        return None;
    }

    let columns = COLUMNS
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(",");

    let rows: Vec<String> = events
        .iter()
        .map(|event| {
            let values: Vec<String> = row(event).iter().map(SqlValue::render).collect();
            format!("({})", values.join(","))
        })
        .collect();

    Some(format!(
        "insert into {table} ({columns}) values \n{};",
        rows.join(",\n")
    ))
}

/// Schema and table DDL matching [`COLUMNS`].
pub fn render_create_table(table: &str) -> String {
    let mut ddl = String::new();

    if let Some((schema, _)) = table.split_once('.') {
        ddl.push_str(&format!("create schema if not exists {schema};\n"));
    }
    ddl.push_str(&format!(
        "create table if not exists {table} ( id text, calendar text, name text, created timestamp, \
         description text, start timestamp, \"end\" timestamp, attendees text[]);\n"
    ));

    ddl
}

pub fn write_sql<W: Write>(events: &[Event], options: &SqlOptions, mut writer: W) -> CalFlatResult<()> {
    if options.create_table {
        writer.write_all(render_create_table(&options.table).as_bytes())?;
    }

    match render_insert(events, &options.table) {
        Some(statement) => writer.write_all(statement.as_bytes())?,
        None => warn!(table = %options.table, "no events to insert"),
    }

    writer.flush()?;
    Ok(())
}
