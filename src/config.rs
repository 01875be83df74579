//! Layered settings: defaults, config file, `CALFLAT_*` environment, flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use calflat_core::output::DEFAULT_TABLE;
use calflat_core::{ErrorPolicy, OutputFormat, SqlOptions};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::cli::Cli;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub calendar_url: Option<String>,
    pub calendar_name: Option<String>,
    pub format: OutputFormat,
    /// Output path, "-" for stdout
    pub output: Option<String>,
    pub table: String,
    pub create_table: bool,
    pub strict: bool,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            calendar_url: None,
            calendar_name: None,
            format: OutputFormat::Json,
            output: None,
            table: DEFAULT_TABLE.to_string(),
            create_table: false,
            strict: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Flags take precedence over everything loaded from file and environment.
    pub fn merge(mut self, cli: &Cli) -> Self {
        if let Some(url) = &cli.calendar_url {
            self.calendar_url = Some(url.clone());
        }
        if let Some(name) = &cli.calendar_name {
            self.calendar_name = Some(name.clone());
        }
        if cli.sql {
            self.format = OutputFormat::Sql;
        } else if cli.json {
            self.format = OutputFormat::Json;
        }
        if let Some(output) = &cli.output {
            self.output = Some(output.clone());
        }
        if let Some(table) = &cli.table {
            self.table = table.clone();
        }
        self.create_table |= cli.create_table;
        self.strict |= cli.strict;
        self
    }

    pub fn policy(&self) -> ErrorPolicy {
        if self.strict {
            ErrorPolicy::Abort
        } else {
            ErrorPolicy::Skip
        }
    }

    pub fn sql_options(&self) -> SqlOptions {
        SqlOptions {
            table: self.table.clone(),
            create_table: self.create_table,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Output path with `~` expanded, `None` for stdout.
    pub fn output_path(&self) -> Option<PathBuf> {
        let output = self
            .output
            .as_deref()
            .unwrap_or_else(|| self.format.default_path());

        (output != "-").then(|| expand_path(output))
    }
}

/// ~/.config/calflat/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("calflat").join("config.toml"))
}

/// Load settings. An explicit `path` must exist; the default one may not.
pub fn load(path: Option<&Path>) -> Result<Settings> {
    let (path, required) = match path {
        Some(p) => (Some(expand_path(&p.to_string_lossy())), true),
        None => (default_config_path(), false),
    };

    let mut builder = Config::builder();
    if let Some(path) = &path {
        builder = builder.add_source(File::from(path.clone()).required(required));
    }
    builder = builder.add_source(Environment::with_prefix("CALFLAT"));

    let settings: Settings = builder
        .build()
        .and_then(|cfg| cfg.try_deserialize::<Settings>())
        .with_context(|| match &path {
            Some(p) => format!("Failed to load config from {}", p.display()),
            None => "Failed to load config".to_string(),
        })?;

    Ok(settings)
}

pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.table, "google_calendar.events");
        assert_eq!(settings.policy(), ErrorPolicy::Skip);
        assert_eq!(settings.output_path(), Some(PathBuf::from("calendar_events.json")));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "calendar_url = \"https://example.com/cal.ics\"\n\
             format = \"sql\"\n\
             table = \"cal.events\"\n\
             strict = true\n\
             timeout_secs = 5"
        )
        .unwrap();

        let settings = load(Some(file.path())).unwrap();

        assert_eq!(settings.calendar_url.as_deref(), Some("https://example.com/cal.ics"));
        assert_eq!(settings.format, OutputFormat::Sql);
        assert_eq!(settings.table, "cal.events");
        assert_eq!(settings.policy(), ErrorPolicy::Abort);
        assert_eq!(settings.timeout(), Duration::from_secs(5));
        assert_eq!(settings.output_path(), Some(PathBuf::from("calendar_events.sql")));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_flags_override_file_values() {
        let base = Settings {
            format: OutputFormat::Sql,
            table: "from_file".into(),
            ..Settings::default()
        };
        let cli = Cli {
            json: true,
            output: Some("-".into()),
            table: Some("from_flag".into()),
            create_table: true,
            ..Cli::default()
        };

        let merged = base.merge(&cli);

        assert_eq!(merged.format, OutputFormat::Json);
        assert_eq!(merged.table, "from_flag");
        assert_eq!(merged.output_path(), None);
        assert_eq!(
            merged.sql_options(),
            SqlOptions {
                table: "from_flag".into(),
                create_table: true
            }
        );
    }
}
