//! Analysis passes over a written dataset
//!
//! Both passes read only the dataset file produced by a successful crawl:
//! - `stats`: per-author counts, tag frequencies and text lengths
//! - `sentiment`: lexicon-based polarity per record
//!
//! Neither pass touches the network or the crawl state.

pub mod sentiment;
pub mod stats;
mod table;

pub use sentiment::{run_sentiment, score_text, SentimentLabel, SentimentReport, SentimentScore};
pub use stats::{compute_statistics, print_statistics, run_statistics, QuoteStatistics};
pub use table::DatasetTable;

use crate::output::WriteError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the analysis passes
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Dataset not found at {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("Dataset {} has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("Failed to read dataset {}: {source}", path.display())]
    Read { path: PathBuf, source: csv::Error },

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
