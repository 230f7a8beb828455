//! Column-addressed view of a dataset CSV
//!
//! Analysis passes must tolerate datasets produced by other tools, so the
//! file is read by header name rather than into `Record`s.

use crate::analysis::{AnalysisError, AnalysisResult};
use csv::StringRecord;
use std::path::{Path, PathBuf};

/// A loaded CSV file with its header row
#[derive(Debug, Clone)]
pub struct DatasetTable {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl DatasetTable {
    /// Reads the whole file at `path`
    ///
    /// Rows may be ragged; a short row reads as empty in its missing cells.
    pub fn load(path: &Path) -> AnalysisResult<Self> {
        if !path.is_file() {
            return Err(AnalysisError::MissingInput {
                path: path.to_path_buf(),
            });
        }

        let read_error = |source| AnalysisError::Read {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(read_error)?;

        let headers = reader
            .headers()
            .map_err(read_error)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_error)?;

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the named column, if present
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of the named column, or a `MissingColumn` error
    pub fn require_column(&self, name: &str) -> AnalysisResult<usize> {
        self.column(name).ok_or_else(|| AnalysisError::MissingColumn {
            path: self.path.clone(),
            column: name.to_string(),
        })
    }

    /// Cell value of `column` in `row`, `""` when absent
    pub fn cell(&self, row: usize, column: Option<usize>) -> &str {
        column
            .and_then(|c| self.rows.get(row).and_then(|r| r.get(c)))
            .unwrap_or("")
    }

    /// Every cell of one row, padded to the header width
    pub fn row(&self, row: usize) -> Vec<&str> {
        (0..self.headers.len())
            .map(|c| self.cell(row, Some(c)))
            .collect()
    }
}
