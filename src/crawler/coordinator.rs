//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that drives:
//! - Fetching the frontier page
//! - Extracting its records and next-page link
//! - Appending records to the dataset
//! - Pacing, page ceiling and cancellation
//!
//! The run is all-or-nothing: any failure discards the partial dataset.

use crate::config::CrawlerConfig;
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::scheduler::{NextPage, Scheduler};
use crate::record::Dataset;
use crate::state::CrawlState;
use crate::{ConfigError, CrawlError};
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Result of a crawl that reached `Done`
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Every record, in page-visit then in-page order
    pub dataset: Dataset,

    /// Number of pages fetched
    pub pages_visited: u32,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Main crawler coordinator structure
pub struct Coordinator<F: PageFetcher> {
    fetcher: F,
    extractor: Extractor,
    scheduler: Scheduler,
    dataset: Dataset,
    state: CrawlState,
    cancel: CancellationToken,
}

impl<F: PageFetcher> Coordinator<F> {
    /// Creates a coordinator in the `Idle` state
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Retrieves pages, including its own retry policy
    /// * `extractor` - Compiled selectors for the target site
    /// * `config` - Seed URL, politeness interval and page ceiling
    /// * `cancel` - Checked before every fetch
    pub fn new(
        fetcher: F,
        extractor: Extractor,
        config: &CrawlerConfig,
        cancel: CancellationToken,
    ) -> Result<Self, CrawlError> {
        let seed = Url::parse(&config.seed_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", config.seed_url, e))
        })?;

        Ok(Self {
            fetcher,
            extractor,
            scheduler: Scheduler::new(seed, config),
            dataset: Dataset::new(),
            state: CrawlState::Idle,
            cancel,
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Runs the crawl loop to completion
    ///
    /// Each iteration:
    /// 1. Checks for cancellation while a page remains
    /// 2. Asks the scheduler for the next page (or stops / hits the ceiling)
    /// 3. Waits out the politeness interval
    /// 4. Fetches, extracts, appends and advances the frontier
    ///
    /// On success the dataset is moved out in the returned outcome.
    pub async fn run(mut self) -> Result<CrawlOutcome, CrawlError> {
        let started_at = Utc::now();
        self.transition(CrawlState::Running)?;

        loop {
            if self.cancel.is_cancelled() {
                if let Some(url) = self.scheduler.frontier().map(Url::to_string) {
                    return Err(self.fail(CrawlError::Cancelled { url }));
                }
            }

            let url = match self.scheduler.next_page() {
                NextPage::Exhausted => break,
                NextPage::LimitReached { limit, url } => {
                    return Err(self.fail(CrawlError::LimitExceeded {
                        limit,
                        url: url.to_string(),
                    }));
                }
                NextPage::Fetch(url) => url,
            };

            if !wait_for_turn(&self.scheduler, &self.cancel).await {
                return Err(self.fail(CrawlError::Cancelled {
                    url: url.to_string(),
                }));
            }

            self.scheduler.record_fetch_start();
            tracing::info!(
                "Fetching page {}: {}",
                self.scheduler.pages_fetched(),
                url
            );

            let document = match self.fetcher.fetch(&url).await {
                Ok(document) => document,
                Err(e) => return Err(self.fail(e.into())),
            };
            self.scheduler.record_request_start(document.requested_at);

            let page = match self.extractor.extract(&document) {
                Ok(page) => page,
                Err(source) => {
                    return Err(self.fail(CrawlError::Extract {
                        url: url.to_string(),
                        source,
                    }));
                }
            };

            tracing::debug!(
                "Extracted {} record(s) from {}, next: {}",
                page.records.len(),
                url,
                page.next.as_ref().map_or("none", |u| u.as_str())
            );

            self.dataset.extend_page(page.records);
            self.scheduler.advance(page.next);
        }

        self.transition(CrawlState::Done)?;
        tracing::info!(
            "Crawl complete: {} record(s) from {} page(s)",
            self.dataset.len(),
            self.scheduler.pages_fetched()
        );

        Ok(CrawlOutcome {
            pages_visited: self.scheduler.pages_fetched(),
            dataset: std::mem::take(&mut self.dataset),
            started_at,
            finished_at: Utc::now(),
        })
    }

    fn transition(&mut self, next: CrawlState) -> Result<(), CrawlError> {
        if !self.state.can_transition_to(next) {
            return Err(CrawlError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!("Crawl state: {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Moves to `Failed`, discards the partial dataset and hands back the cause
    fn fail(&mut self, error: CrawlError) -> CrawlError {
        let discarded = std::mem::take(&mut self.dataset).len();
        if let Err(e) = self.transition(CrawlState::Failed) {
            tracing::error!("{}", e);
        }
        tracing::error!(
            "Crawl failed after {} page(s), discarding {} record(s): {}",
            self.scheduler.pages_fetched(),
            discarded,
            error
        );
        error
    }
}

/// Waits out the politeness interval, returning false if cancelled first
///
/// Cancellation is polled first so an elapsed interval never lets a fetch
/// start after the token fired.
async fn wait_for_turn(scheduler: &Scheduler, cancel: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        () = cancel.cancelled() => false,
        () = scheduler.pace() => true,
    }
}
