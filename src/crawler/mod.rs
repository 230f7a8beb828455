//! Crawler module for paginated quote harvesting
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry and backoff
//! - Quote and next-link extraction
//! - Frontier pacing and the page ceiling
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod scheduler;

pub use coordinator::{Coordinator, CrawlOutcome};
pub use extractor::{ExtractError, ExtractedPage, Extractor};
pub use fetcher::{
    backoff_delay, build_http_client, format_user_agent, FetchCause, FetchError, HttpFetcher,
    PageFetcher, RawDocument,
};
pub use scheduler::{NextPage, Scheduler};

use crate::config::Config;
use crate::output::{CsvDatasetWriter, DatasetWriter};
use crate::CrawlError;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Summary of a crawl whose dataset was written
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub records_written: usize,
    pub pages_visited: u32,
    pub destination: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Wall-clock duration of the crawl loop
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Runs a complete crawl and writes the dataset
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the HTTP client and fetcher
/// 2. Compile the extractor selectors
/// 3. Follow the next-page chain from the seed URL
/// 4. Write the dataset atomically to `output.dataset-path`
///
/// Nothing is written unless the crawl reaches `Done`.
///
/// # Example
///
/// ```no_run
/// use quote_crawler::config::load_config;
/// use quote_crawler::crawler::crawl;
/// use std::path::Path;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("quotes.toml"))?;
/// let report = crawl(&config, CancellationToken::new()).await?;
/// println!("{} quotes saved", report.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config, cancel: CancellationToken) -> Result<CrawlReport, CrawlError> {
    let client = build_http_client(&config.user_agent, &config.crawler)?;
    let fetcher = HttpFetcher::new(
        client,
        config.retry.clone(),
        Duration::from_millis(config.crawler.politeness_interval),
    );
    let extractor = Extractor::new(&config.extractor)?;

    let outcome = Coordinator::new(fetcher, extractor, &config.crawler, cancel)?
        .run()
        .await?;

    let destination = Path::new(&config.output.dataset_path);
    CsvDatasetWriter::new().write(&outcome.dataset, destination)?;

    Ok(CrawlReport {
        records_written: outcome.dataset.len(),
        pages_visited: outcome.pages_visited,
        destination: destination.to_path_buf(),
        started_at: outcome.started_at,
        finished_at: outcome.finished_at,
    })
}
