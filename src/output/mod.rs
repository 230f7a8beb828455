//! Output module for persisting crawl results
//!
//! This module handles:
//! - Serializing the finished dataset to CSV with a fixed schema
//! - Atomic replacement of output files, so a failed run never leaves a
//!   half-written or partial dataset behind

mod dataset;
mod traits;

pub use dataset::{CsvDatasetWriter, DATASET_HEADER};
pub use traits::{DatasetWriter, OutputResult, WriteError};

pub(crate) use dataset::{csv_writer_builder, write_atomically};
