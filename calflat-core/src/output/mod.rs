//! Writers for the flattened event list.

mod json;
mod sql;

use std::io::Write;

use serde::Deserialize;

use crate::error::CalFlatResult;
use crate::event::Event;

pub use json::write_json_lines;
pub use sql::{COLUMNS, DEFAULT_TABLE, SqlOptions, render_create_table, render_insert, write_sql};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// A single multi-row INSERT statement
    Sql,
}

impl OutputFormat {
    /// File written when no output path is configured.
    pub fn default_path(&self) -> &'static str {
        match self {
            OutputFormat::Json => "calendar_events.json",
            OutputFormat::Sql => "calendar_events.sql",
        }
    }
}

/// Write `events` in the requested format.
pub fn write_events<W: Write>(
    events: &[Event],
    format: OutputFormat,
    sql: &SqlOptions,
    writer: W,
) -> CalFlatResult<()> {
    match format {
        OutputFormat::Json => write_json_lines(events, writer),
        OutputFormat::Sql => write_sql(events, sql, writer),
    }
}
