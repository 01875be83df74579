//! Progress display while the feed is read.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::debug;

use crate::fetch::FeedSource;

/// The last tick is shown once the spinner finishes.
const TICKS: &[&str] = &["◐", "◓", "◑", "◒", "●"];
const TEMPLATE: &str = "{spinner:.cyan} {prefix} {wide_msg} [{elapsed}]";

/// Spinner on stderr for the duration of a feed fetch. `quiet` hides it,
/// e.g. when debug logs would interleave with it.
pub fn feed_spinner(source: &FeedSource, quiet: bool) -> ProgressBar {
    let target = if quiet {
        ProgressDrawTarget::hidden()
    } else {
        ProgressDrawTarget::stderr()
    };
    let spinner = ProgressBar::with_draw_target(None, target);

    match ProgressStyle::with_template(TEMPLATE) {
        Ok(style) => spinner.set_style(style.tick_strings(TICKS)),
        Err(e) => debug!(error = %e, "falling back to the default spinner style"),
    }

    spinner.set_prefix(match source {
        FeedSource::Remote(_) => "Downloading",
        FeedSource::Local(_) => "Reading",
    });
    spinner.set_message(source.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
