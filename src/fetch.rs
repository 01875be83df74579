//! Reads the calendar feed from the web or from disk.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::debug;
use url::Url;

use crate::config::expand_path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Remote(Url),
    Local(PathBuf),
}

impl FeedSource {
    /// Interpret a feed location. `webcal://` is fetched over https; anything
    /// that is not a URL is treated as a file path.
    pub fn parse(location: &str) -> Result<Self> {
        let location = location.trim();

        let Ok(url) = Url::parse(location) else {
            return Ok(FeedSource::Local(expand_path(location)));
        };

        match url.scheme() {
            "http" | "https" => Ok(FeedSource::Remote(url)),
            "webcal" | "webcals" => {
                let rest = &location[url.scheme().len()..];
                let https = Url::parse(&format!("https{rest}"))
                    .with_context(|| format!("Invalid webcal URL '{location}'"))?;
                Ok(FeedSource::Remote(https))
            }
            "file" => url
                .to_file_path()
                .map(FeedSource::Local)
                .map_err(|_| anyhow::anyhow!("Invalid file URL '{location}'")),
            other => bail!("Unsupported feed scheme '{other}' in '{location}'"),
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Remote(url) => write!(f, "{url}"),
            FeedSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch the raw iCalendar text.
pub async fn fetch(source: &FeedSource, timeout: Duration) -> Result<String> {
    match source {
        FeedSource::Local(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read calendar file {}", path.display())),
        FeedSource::Remote(url) => {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .context("Failed to build HTTP client")?;

            let response = client
                .get(url.clone())
                .send()
                .await
                .with_context(|| format!("Failed to fetch {url}"))?
                .error_for_status()
                .with_context(|| format!("Calendar server rejected {url}"))?;

            let body = response
                .text()
                .await
                .with_context(|| format!("Failed to read response body from {url}"))?;

            debug!(%url, bytes = body.len(), "fetched calendar");
            Ok(body)
        }
    }
}
