use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "calflat")]
#[command(about = "Flatten an iCalendar feed into JSON lines or SQL insert statements")]
pub struct Cli {
    /// Feed location: http(s)://, webcal://, file:// or a local path
    #[arg(long)]
    pub calendar_url: Option<String>,

    /// Name stored in every event's `calendar` field
    #[arg(long)]
    pub calendar_name: Option<String>,

    /// Write one JSON object per line (default)
    #[arg(long, conflicts_with = "sql")]
    pub json: bool,

    /// Write a single SQL insert statement
    #[arg(long)]
    pub sql: bool,

    /// Output file, or "-" for stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Table for SQL output (e.g. "google_calendar.events")
    #[arg(long)]
    pub table: Option<String>,

    /// Prefix SQL output with create schema/table statements
    #[arg(long)]
    pub create_table: bool,

    /// Fail on the first malformed event instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Config file (defaults to ~/.config/calflat/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_and_sql_conflict() {
        let result = Cli::try_parse_from(["calflat", "--json", "--sql"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::try_parse_from([
            "calflat",
            "--calendar-url",
            "webcal://example.com/cal.ics",
            "--calendar-name",
            "Team",
            "--sql",
            "-o",
            "-",
            "--create-table",
        ])
        .unwrap();

        assert_eq!(cli.calendar_url.as_deref(), Some("webcal://example.com/cal.ics"));
        assert_eq!(cli.calendar_name.as_deref(), Some("Team"));
        assert!(cli.sql);
        assert!(cli.create_table);
        assert_eq!(cli.output.as_deref(), Some("-"));
    }
}
