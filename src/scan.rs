//! One scan run: fetch every source in order, render the report, write it.
use chrono::Utc;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::Config;
use crate::feed::{FeedFetcher, FetchError};
use crate::highlight::{HighlightError, Highlighter};
use crate::report::{
    fallback_title, palette_color, render_entry, write_report, ReportBuilder, RenderedEntry,
    WriteError,
};

/// Errors that abort a scan. A failed source only lands here in fail-fast
/// mode; otherwise it is rendered into the report as an error section.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Highlight(#[from] HighlightError),

    #[error("Failed to fetch '{url}': {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// What happened to one source during the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub url: String,
    /// Section heading used in the report.
    pub title: String,
    /// Entries that matched at least one keyword.
    pub matched: usize,
    /// Fetch/parse error message when the source failed.
    pub error: Option<String>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub output_path: PathBuf,
    pub sources: Vec<SourceReport>,
}

impl ScanSummary {
    pub fn matched_entries(&self) -> usize {
        self.sources.iter().map(|s| s.matched).sum()
    }

    pub fn failed(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources.iter().filter(|s| s.error.is_some())
    }
}

/// Fetch every configured source, render the report and write it to
/// `config.output_path`.
///
/// Sources are fetched one at a time, in configuration order. With
/// `config.fail_fast` the first failure aborts the run before anything is
/// written; otherwise the failing source gets an error section and the run
/// continues.
pub async fn run<F: FeedFetcher>(config: &Config, fetcher: &F) -> Result<ScanSummary, ScanError> {
    let (html, sources) = build_report(config, fetcher).await?;
    write_report(&config.output_path, &html)?;

    tracing::info!(
        path = %config.output_path.display(),
        sources = sources.len(),
        "Report generated"
    );

    Ok(ScanSummary {
        output_path: config.output_path.clone(),
        sources,
    })
}

/// Build the report in memory without writing it.
pub async fn build_report<F: FeedFetcher>(
    config: &Config,
    fetcher: &F,
) -> Result<(String, Vec<SourceReport>), ScanError> {
    let highlighter = Highlighter::new(&config.keywords)?;
    let mut report = ReportBuilder::new(&config.report_title, Utc::now());
    let mut sources = Vec::with_capacity(config.sources.len());

    for (index, url) in config.sources.iter().enumerate() {
        let color = palette_color(&config.palette, index);
        tracing::debug!(index = index, url = %url, "Fetching source");

        match fetcher.fetch(url).await {
            Ok(feed) => {
                let title = feed.title.unwrap_or_else(|| fallback_title(index));
                let entries: Vec<RenderedEntry> = feed
                    .entries
                    .iter()
                    .filter_map(|entry| render_entry(&highlighter, entry))
                    .collect();

                tracing::info!(
                    url = %url,
                    title = %title,
                    entries = feed.entries.len(),
                    matched = entries.len(),
                    "Scanned feed"
                );

                report.add_feed_section(&title, color, &entries);
                sources.push(SourceReport {
                    url: url.clone(),
                    title,
                    matched: entries.len(),
                    error: None,
                });
            }
            Err(e) if config.fail_fast => {
                tracing::warn!(url = %url, error = %e, "Fetch failed, aborting run");
                return Err(ScanError::Fetch {
                    url: url.clone(),
                    source: e,
                });
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Fetch failed, continuing with next source");
                let title = fallback_title(index);
                let message = e.to_string();
                report.add_failed_section(&title, color, url, &message);
                sources.push(SourceReport {
                    url: url.clone(),
                    title,
                    matched: 0,
                    error: Some(message),
                });
            }
        }
    }

    Ok((report.finish(), sources))
}
