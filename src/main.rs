mod cli;
mod config;
mod fetch;
mod logging;
mod utils;

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal};

use anyhow::{Context, Result, bail};
use calflat_core::output::write_events;
use calflat_core::{AssembleOptions, Event};
use chrono::Local;
use clap::Parser;
use dialoguer::Input;
use tracing::{info, warn};

use cli::Cli;
use config::Settings;
use fetch::FeedSource;
use utils::tui::feed_spinner;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let settings = config::load(cli.config.as_deref())?.merge(&cli);
    run(settings, cli.verbose).await
}

async fn run(settings: Settings, verbose: bool) -> Result<()> {
    let interactive = io::stdin().is_terminal();

    let location = match &settings.calendar_url {
        Some(url) => url.clone(),
        None if interactive => Input::<String>::new()
            .with_prompt("Calendar URL")
            .interact_text()?,
        None => bail!(
            "No calendar URL given.\n\n\
            Pass --calendar-url, set CALFLAT_CALENDAR_URL, or add calendar_url to the config file"
        ),
    };

    let calendar_name = match &settings.calendar_name {
        Some(name) => Some(name.clone()),
        None if interactive => Some(
            Input::<String>::new()
                .with_prompt("Calendar Name")
                .interact_text()?,
        ),
        None => None,
    };

    let source = FeedSource::parse(&location)?;

    let spinner = feed_spinner(&source, verbose);
    let content = fetch::fetch(&source, settings.timeout()).await;
    spinner.finish_and_clear();
    let content = content?;

    let mut options = AssembleOptions::new(Local::now().naive_local()).policy(settings.policy());
    options.calendar = calendar_name;

    let events = calflat_core::flatten(&content, &options)
        .with_context(|| format!("Failed to flatten calendar from {source}"))?;

    if events.is_empty() {
        warn!(%source, "calendar produced no events");
    }

    write_output(&events, &settings)
}

fn write_output(events: &[Event], settings: &Settings) -> Result<()> {
    let sql = settings.sql_options();

    match settings.output_path() {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            write_events(events, settings.format, &sql, BufWriter::new(file))
                .with_context(|| format!("Failed to write {}", path.display()))?;

            info!(events = events.len(), output = %path.display(), "wrote events");
            println!("Wrote {} events to {}", events.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            write_events(events, settings.format, &sql, stdout.lock())
                .context("Failed to write events to stdout")?;
        }
    }

    Ok(())
}
