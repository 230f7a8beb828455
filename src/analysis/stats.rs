//! Statistics over a quote dataset
//!
//! This module computes per-author counts, tag frequencies and quote
//! length figures, prints a preview, and writes summary artifacts.
//! Missing `author`, `tags` or `text` columns are treated as empty. Inside
//! an existing `author` column, blank cells are skipped rather than counted
//! as an author.

use crate::analysis::{AnalysisResult, DatasetTable};
use crate::output::{csv_writer_builder, write_atomically, WriteError};
use crate::record::TAG_DELIMITER;
use std::collections::HashMap;
use std::path::Path;

/// How many authors are kept in `top_authors.csv`
pub const TOP_AUTHORS: usize = 20;

/// How many tags are kept in `top_tags.csv`
pub const TOP_TAGS: usize = 30;

/// How many rows are shown in the printed preview
const PREVIEW_ROWS: usize = 10;

/// Summary statistics of a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteStatistics {
    /// Number of data rows
    pub total_quotes: usize,

    /// Number of distinct author values
    pub unique_authors: usize,

    /// Number of distinct tag labels
    pub unique_tags: usize,

    /// Authors by quote count, descending, ties in first-seen order
    pub top_authors: Vec<(String, u64)>,

    /// Tags by frequency, descending, ties in first-seen order
    pub top_tags: Vec<(String, u64)>,

    /// Mean quote length in characters
    pub mean_quote_len: f64,

    /// Median quote length in characters
    pub median_quote_len: f64,
}

/// Computes statistics from a loaded table
pub fn compute_statistics(table: &DatasetTable) -> QuoteStatistics {
    for column in ["text", "author", "tags"] {
        if table.column(column).is_none() {
            tracing::warn!(
                "Column '{}' missing in {}, treating it as empty",
                column,
                table.path().display()
            );
        }
    }

    let text = table.column("text");
    let author = table.column("author");
    let tags = table.column("tags");

    let mut authors = Counter::default();
    let mut tag_counts = Counter::default();
    let mut lengths = Vec::with_capacity(table.len());

    for row in 0..table.len() {
        lengths.push(table.cell(row, text).chars().count());
        let name = table.cell(row, author);
        if author.is_none() || !name.is_empty() {
            authors.add(name);
        }

        table
            .cell(row, tags)
            .split(TAG_DELIMITER)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .for_each(|t| tag_counts.add(t));
    }

    QuoteStatistics {
        total_quotes: table.len(),
        unique_authors: authors.distinct(),
        unique_tags: tag_counts.distinct(),
        top_authors: authors.most_common(TOP_AUTHORS),
        top_tags: tag_counts.most_common(TOP_TAGS),
        mean_quote_len: mean(&lengths),
        median_quote_len: median(&mut lengths),
    }
}

/// Loads the dataset, computes statistics and writes the artifacts
///
/// Files written into `output_dir`:
/// - `top_authors.csv` (`author,count`)
/// - `top_tags.csv` (`tag,count`), only when any tag exists
/// - `eda_summary.txt`
pub fn run_statistics(dataset: &Path, output_dir: &Path) -> AnalysisResult<QuoteStatistics> {
    let table = DatasetTable::load(dataset)?;
    tracing::info!("Loaded {} row(s) from {}", table.len(), dataset.display());

    let stats = compute_statistics(&table);

    std::fs::create_dir_all(output_dir).map_err(|source| WriteError::Io {
        destination: output_dir.to_path_buf(),
        source,
    })?;

    let authors_path = output_dir.join("top_authors.csv");
    write_counts(&authors_path, "author", &stats.top_authors)?;
    tracing::info!("Saved: {}", authors_path.display());

    if stats.top_tags.is_empty() {
        tracing::info!("No tags found, skipping top_tags.csv");
    } else {
        let tags_path = output_dir.join("top_tags.csv");
        write_counts(&tags_path, "tag", &stats.top_tags)?;
        tracing::info!("Saved: {}", tags_path.display());
    }

    let summary_path = output_dir.join("eda_summary.txt");
    write_atomically(&summary_path, format_summary(&stats).as_bytes())?;
    tracing::info!("Saved: {}", summary_path.display());

    Ok(stats)
}

/// Formats the plain-text summary file
pub fn format_summary(stats: &QuoteStatistics) -> String {
    format!(
        "total_quotes: {}\nunique_authors: {}\nunique_tags: {}\nmean_quote_len: {:.2}\nmedian_quote_len: {:.1}\n",
        stats.total_quotes,
        stats.unique_authors,
        stats.unique_tags,
        stats.mean_quote_len,
        stats.median_quote_len
    )
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &QuoteStatistics) {
    println!("=== Quote Statistics ===\n");

    println!("Overview:");
    println!("  Total quotes: {}", stats.total_quotes);
    println!("  Unique authors: {}", stats.unique_authors);
    println!("  Unique tags: {}", stats.unique_tags);
    println!();

    println!("Top authors (preview):");
    for (author, count) in stats.top_authors.iter().take(PREVIEW_ROWS) {
        println!("  {}: {}", author, count);
    }
    println!();

    if !stats.top_tags.is_empty() {
        println!("Top tags (preview):");
        for (tag, count) in stats.top_tags.iter().take(PREVIEW_ROWS) {
            println!("  {}: {}", tag, count);
        }
        println!();
    }

    println!(
        "Quote length: mean = {:.2}, median = {:.1}",
        stats.mean_quote_len, stats.median_quote_len
    );
}

fn write_counts(path: &Path, label: &str, counts: &[(String, u64)]) -> AnalysisResult<()> {
    let csv_error = |source| WriteError::Csv {
        destination: path.to_path_buf(),
        source,
    };

    let mut writer = csv_writer_builder().from_writer(Vec::new());
    writer.write_record([label, "count"]).map_err(csv_error)?;
    for (value, count) in counts {
        writer
            .write_record([value.as_str(), count.to_string().as_str()])
            .map_err(csv_error)?;
    }

    let bytes = writer.into_inner().map_err(|e| WriteError::Io {
        destination: path.to_path_buf(),
        source: e.into_error(),
    })?;
    write_atomically(path, &bytes)?;
    Ok(())
}

/// Frequency counter that remembers first-seen order for tie breaking
#[derive(Debug, Default)]
struct Counter {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl Counter {
    fn add(&mut self, value: &str) {
        match self.index.get(value) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(value.to_string(), self.entries.len());
                self.entries.push((value.to_string(), 1));
            }
        }
    }

    fn distinct(&self) -> usize {
        self.entries.len()
    }

    fn most_common(&self, n: usize) -> Vec<(String, u64)> {
        let mut sorted = self.entries.clone();
        // Stable sort keeps first-seen order among equal counts
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }
}

fn mean(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<usize>() as f64 / values.len() as f64
}

fn median(values: &mut [usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) as f64 / 2.0
    } else {
        values[mid] as f64
    }
}
