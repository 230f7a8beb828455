//! Scheduler for the crawl frontier and politeness pacing
//!
//! This module handles:
//! - Holding the single-URL frontier of a paginated crawl
//! - Enforcing a minimum interval between the *starts* of consecutive fetches
//! - Counting fetched pages against an optional safety ceiling

use crate::config::CrawlerConfig;
use std::time::Duration;
use tokio::time::{sleep_until, Instant, Sleep};
use url::Url;

/// Outcome of asking the scheduler for the next page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch this URL next
    Fetch(Url),

    /// The frontier is empty; the crawl is complete
    Exhausted,

    /// A page remains but the page ceiling has been reached
    LimitReached { limit: u32, url: Url },
}

/// Scheduler manages the frontier and pacing for a sequential crawl
///
/// Pagination is a linear dependency chain, so the frontier is a single
/// optional URL rather than a queue. No visited set is kept; the page
/// ceiling is the only protection against a cyclic chain.
#[derive(Debug)]
pub struct Scheduler {
    /// The next page to fetch, if any
    frontier: Option<Url>,

    /// Minimum time between fetch starts
    interval: Duration,

    /// Start time of the most recent fetch
    last_fetch_start: Option<Instant>,

    /// Pages handed out so far
    pages_fetched: u32,

    /// Optional ceiling on pages_fetched
    max_pages: Option<u32>,
}

impl Scheduler {
    /// Creates a scheduler whose frontier holds only the seed URL
    pub fn new(seed: Url, config: &CrawlerConfig) -> Self {
        Self {
            frontier: Some(seed),
            interval: Duration::from_millis(config.politeness_interval),
            last_fetch_start: None,
            pages_fetched: 0,
            max_pages: config.max_pages,
        }
    }

    /// Decides what the controller should do next
    ///
    /// This does not wait; call [`Scheduler::pace`] before fetching.
    pub fn next_page(&self) -> NextPage {
        let Some(url) = &self.frontier else {
            return NextPage::Exhausted;
        };

        match self.max_pages {
            Some(limit) if self.pages_fetched >= limit => NextPage::LimitReached {
                limit,
                url: url.clone(),
            },
            _ => NextPage::Fetch(url.clone()),
        }
    }

    /// Returns a timer that completes once the politeness interval has passed
    ///
    /// The interval is measured from the start of the previous fetch, so slow
    /// extraction does not push later fetches further apart. The first fetch
    /// is never delayed.
    pub fn pace(&self) -> Sleep {
        let deadline = match self.last_fetch_start {
            Some(last) => last + self.interval,
            None => Instant::now(),
        };
        sleep_until(deadline)
    }

    /// Records that a fetch is starting now
    pub fn record_fetch_start(&mut self) {
        self.last_fetch_start = Some(Instant::now());
        self.pages_fetched += 1;
    }

    /// Moves the pacing reference to a later request start
    ///
    /// A fetch that retried sent its last request after
    /// [`Scheduler::record_fetch_start`]; the next page is paced from that
    /// request instead. Earlier instants are ignored.
    pub fn record_request_start(&mut self, at: Instant) {
        if self.last_fetch_start.map_or(true, |last| at > last) {
            self.last_fetch_start = Some(at);
        }
    }

    /// Replaces the frontier with the page's next reference
    pub fn advance(&mut self, next: Option<Url>) {
        self.frontier = next;
    }

    /// Number of fetches started so far
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    pub fn frontier(&self) -> Option<&Url> {
        self.frontier.as_ref()
    }
}
