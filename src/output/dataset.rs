//! CSV dataset writer
//!
//! The whole file is rendered in memory, written to a temporary file in the
//! destination directory, and then renamed into place. A failure at any step
//! leaves an existing destination untouched.

use crate::output::traits::{DatasetWriter, OutputResult, WriteError};
use crate::record::{Dataset, TAG_DELIMITER};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Fixed column order of the dataset file
pub const DATASET_HEADER: [&str; 3] = ["text", "author", "tags"];

/// Writes datasets as `text,author,tags` CSV
///
/// Tags are joined with `,`. A tag that itself contains `,` cannot be
/// represented in that column and is rejected before anything is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvDatasetWriter;

impl CsvDatasetWriter {
    pub fn new() -> Self {
        Self
    }

    /// Renders the dataset to CSV bytes
    pub fn render(&self, dataset: &Dataset, destination: &Path) -> OutputResult<Vec<u8>> {
        for (index, record) in dataset.iter().enumerate() {
            if let Some(tag) = record.tags.iter().find(|t| t.contains(TAG_DELIMITER)) {
                return Err(WriteError::DelimiterInTag {
                    destination: destination.to_path_buf(),
                    index,
                    tag: tag.clone(),
                });
            }
        }

        let csv_error = |source| WriteError::Csv {
            destination: destination.to_path_buf(),
            source,
        };

        let mut writer = csv_writer_builder().from_writer(Vec::new());
        writer.write_record(DATASET_HEADER).map_err(csv_error)?;
        for record in dataset {
            writer
                .write_record([
                    record.text.as_str(),
                    record.author.as_str(),
                    record.joined_tags().as_str(),
                ])
                .map_err(csv_error)?;
        }

        writer.into_inner().map_err(|e| WriteError::Io {
            destination: destination.to_path_buf(),
            source: e.into_error(),
        })
    }
}

impl DatasetWriter for CsvDatasetWriter {
    fn write(&self, dataset: &Dataset, destination: &Path) -> OutputResult<()> {
        let bytes = self.render(dataset, destination)?;
        write_atomically(destination, &bytes)?;
        tracing::info!(
            "Wrote {} record(s) to {}",
            dataset.len(),
            destination.display()
        );
        Ok(())
    }
}

/// CSV settings shared by every file this crate writes
pub(crate) fn csv_writer_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder.terminator(csv::Terminator::Any(b'\n'));
    builder
}

/// Replaces `destination` with `bytes` via a temp file and rename
///
/// The temp file lives next to the destination so the final rename never
/// crosses a filesystem.
pub(crate) fn write_atomically(destination: &Path, bytes: &[u8]) -> OutputResult<()> {
    let io_error = |source| WriteError::Io {
        destination: destination.to_path_buf(),
        source,
    };

    let parent = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent).map_err(io_error)?;
    temp.write_all(bytes).map_err(io_error)?;
    temp.as_file().sync_all().map_err(io_error)?;
    temp.persist(destination).map_err(|e| io_error(e.error))?;

    Ok(())
}
