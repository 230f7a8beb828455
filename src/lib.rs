//! Quote-Crawler: a polite paginated quote harvester
//!
//! This crate follows a site's "next page" chain from a seed URL, extracts
//! quote records (text, author, tags) from every page, and writes the
//! complete collection to a CSV dataset. Two analysis passes (statistics
//! and lexicon sentiment) consume that dataset afterwards.

pub mod analysis;
pub mod config;
pub mod crawler;
pub mod output;
pub mod record;
pub mod state;

use thiserror::Error;

/// Main error type for a crawl run
///
/// Every variant is fatal to the run: only the fetcher retries locally,
/// everything else propagates here and the partial dataset is dropped.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Fetch(#[from] crawler::FetchError),

    #[error("Extraction failed for {url}: {source}")]
    Extract {
        url: String,
        source: crawler::ExtractError,
    },

    #[error("Page limit of {limit} exceeded before fetching {url}")]
    LimitExceeded { limit: u32, url: String },

    #[error("Crawl cancelled before fetching {url}")]
    Cancelled { url: String },

    #[error(transparent)]
    Write(#[from] output::WriteError),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },
}

impl CrawlError {
    /// Returns the URL of the page the run failed on, if there is one
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Fetch(e) => Some(&e.url),
            Self::Extract { url, .. }
            | Self::LimitExceeded { url, .. }
            | Self::Cancelled { url } => Some(url),
            _ => None,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{Dataset, Record};
pub use state::CrawlState;
