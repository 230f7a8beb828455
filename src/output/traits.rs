//! Output writer traits and errors
//!
//! This module defines the trait interface for dataset writers and the
//! error they report.

use crate::record::Dataset;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while persisting a dataset or report
///
/// Every variant carries the destination that was being written.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to write {}: {source}", destination.display())]
    Io {
        destination: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode CSV for {}: {source}", destination.display())]
    Csv {
        destination: PathBuf,
        source: csv::Error,
    },

    #[error(
        "Refusing to write {}: tag {tag:?} of record {index} contains the ',' tag delimiter",
        destination.display()
    )]
    DelimiterInTag {
        destination: PathBuf,
        index: usize,
        tag: String,
    },
}

impl WriteError {
    /// The file that could not be written
    pub fn destination(&self) -> &Path {
        match self {
            Self::Io { destination, .. }
            | Self::Csv { destination, .. }
            | Self::DelimiterInTag { destination, .. } => destination,
        }
    }
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, WriteError>;

/// Trait for dataset writers
///
/// A writer only reads the dataset. It must either fully replace the
/// destination or leave it untouched.
pub trait DatasetWriter {
    /// Serializes the dataset to `destination`
    ///
    /// # Arguments
    ///
    /// * `dataset` - The finished dataset of a successful crawl
    /// * `destination` - Path of the output file
    fn write(&self, dataset: &Dataset, destination: &Path) -> OutputResult<()>;
}
