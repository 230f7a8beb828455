//! Lexicon-based sentiment scoring
//!
//! Each quote is lowercased, stripped of punctuation other than apostrophes,
//! split on whitespace, and scored by counting hits in two fixed word lists.

use crate::analysis::{AnalysisResult, DatasetTable};
use crate::output::{csv_writer_builder, write_atomically, WriteError};
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "happy",
    "love",
    "wonderful",
    "best",
    "amazing",
    "awesome",
    "excellent",
    "positive",
    "delight",
    "joy",
    "like",
    "enjoy",
    "beautiful",
    "success",
    "peace",
    "inspire",
    "inspirational",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "sad",
    "hate",
    "angry",
    "worse",
    "terrible",
    "awful",
    "horrible",
    "ugly",
    "pain",
    "failure",
    "difficult",
    "hard",
    "angst",
    "regret",
    "problem",
    "negative",
];

/// Rows kept per label in `sentiment_examples.csv`
const EXAMPLES_PER_LABEL: usize = 5;

/// Columns appended to (or replaced in) the scored dataset
const SCORE_COLUMNS: [&str; 3] = ["sentiment", "pos_count", "neg_count"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score of a single text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentScore {
    pub label: SentimentLabel,
    pub pos_count: u32,
    pub neg_count: u32,
}

/// Outcome of a sentiment pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentReport {
    /// Number of rows scored
    pub total: usize,

    /// Label counts, descending, ties in first-seen order
    pub summary: Vec<(SentimentLabel, usize)>,
}

fn punctuation() -> &'static Regex {
    static PUNCTUATION: OnceLock<Regex> = OnceLock::new();
    PUNCTUATION.get_or_init(|| Regex::new(r"[^\w\s']").expect("static pattern is valid"))
}

/// Scores one text against the fixed lexicons
///
/// # Example
///
/// ```
/// use quote_crawler::analysis::{score_text, SentimentLabel};
///
/// let score = score_text("I love this, it is wonderful!");
/// assert_eq!(score.label, SentimentLabel::Positive);
/// assert_eq!(score.pos_count, 2);
/// ```
pub fn score_text(text: &str) -> SentimentScore {
    let lowered = text.to_lowercase();
    let cleaned = punctuation().replace_all(&lowered, " ");

    let (mut pos_count, mut neg_count) = (0, 0);
    for word in cleaned.split_whitespace() {
        if POSITIVE_WORDS.contains(&word) {
            pos_count += 1;
        } else if NEGATIVE_WORDS.contains(&word) {
            neg_count += 1;
        }
    }

    let label = match pos_count.cmp(&neg_count) {
        std::cmp::Ordering::Greater => SentimentLabel::Positive,
        std::cmp::Ordering::Less => SentimentLabel::Negative,
        std::cmp::Ordering::Equal => SentimentLabel::Neutral,
    };

    SentimentScore {
        label,
        pos_count,
        neg_count,
    }
}

/// Scores every row of `dataset` and writes the results into `output_dir`
///
/// Writes `quotes_sentiment.csv`, `sentiment_summary.csv` and
/// `sentiment_examples.csv`. The dataset must have a `text` column.
pub fn run_sentiment(dataset: &Path, output_dir: &Path) -> AnalysisResult<SentimentReport> {
    let table = DatasetTable::load(dataset)?;
    let text = table.require_column("text")?;
    let author = table.column("author");
    tracing::info!("Scoring {} row(s) from {}", table.len(), dataset.display());

    let scores: Vec<SentimentScore> = (0..table.len())
        .map(|row| score_text(table.cell(row, Some(text))))
        .collect();

    std::fs::create_dir_all(output_dir).map_err(|source| WriteError::Io {
        destination: output_dir.to_path_buf(),
        source,
    })?;

    let scored_path = output_dir.join("quotes_sentiment.csv");
    write_csv(&scored_path, scored_rows(&table, &scores))?;
    tracing::info!("Saved sentiment results to {}", scored_path.display());

    let summary = summarize(&scores);
    let summary_path = output_dir.join("sentiment_summary.csv");
    let mut summary_rows = vec![vec!["sentiment".to_string(), "count".to_string()]];
    summary_rows.extend(
        summary
            .iter()
            .map(|(label, count)| vec![label.to_string(), count.to_string()]),
    );
    write_csv(&summary_path, summary_rows)?;
    tracing::info!("Saved sentiment summary to {}", summary_path.display());

    let examples_path = output_dir.join("sentiment_examples.csv");
    write_csv(
        &examples_path,
        example_rows(&table, &scores, Some(text), author),
    )?;
    tracing::info!("Saved sentiment examples to {}", examples_path.display());

    Ok(SentimentReport {
        total: scores.len(),
        summary,
    })
}

/// Prints the label summary
pub fn print_summary(report: &SentimentReport) {
    println!("sentiment,count");
    for (label, count) in &report.summary {
        println!("{},{}", label, count);
    }
}

/// Input columns with the score columns appended or overwritten in place
fn scored_rows(table: &DatasetTable, scores: &[SentimentScore]) -> Vec<Vec<String>> {
    let mut header: Vec<String> = table.headers().to_vec();
    let positions: Vec<usize> = SCORE_COLUMNS
        .iter()
        .map(|name| match table.column(name) {
            Some(i) => i,
            None => {
                header.push(name.to_string());
                header.len() - 1
            }
        })
        .collect();

    let mut rows = Vec::with_capacity(scores.len() + 1);
    rows.push(header.clone());

    for (i, score) in scores.iter().enumerate() {
        let mut row: Vec<String> = table.row(i).into_iter().map(str::to_string).collect();
        row.resize(header.len(), String::new());

        let values = [
            score.label.to_string(),
            score.pos_count.to_string(),
            score.neg_count.to_string(),
        ];
        for (position, value) in positions.iter().zip(values) {
            row[*position] = value;
        }
        rows.push(row);
    }

    rows
}

fn example_rows(
    table: &DatasetTable,
    scores: &[SentimentScore],
    text: Option<usize>,
    author: Option<usize>,
) -> Vec<Vec<String>> {
    let mut rows = vec![["sentiment", "text", "author", "pos_count", "neg_count"]
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()];

    let mut taken = std::collections::HashMap::new();
    for (i, score) in scores.iter().enumerate() {
        let seen = taken.entry(score.label).or_insert(0usize);
        if *seen >= EXAMPLES_PER_LABEL {
            continue;
        }
        *seen += 1;
        rows.push(vec![
            score.label.to_string(),
            table.cell(i, text).to_string(),
            table.cell(i, author).to_string(),
            score.pos_count.to_string(),
            score.neg_count.to_string(),
        ]);
    }

    rows
}

fn summarize(scores: &[SentimentScore]) -> Vec<(SentimentLabel, usize)> {
    let mut counts: Vec<(SentimentLabel, usize)> = Vec::new();
    for score in scores {
        match counts.iter_mut().find(|(label, _)| *label == score.label) {
            Some((_, count)) => *count += 1,
            None => counts.push((score.label, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn write_csv(path: &Path, rows: Vec<Vec<String>>) -> AnalysisResult<()> {
    let csv_error = |source| WriteError::Csv {
        destination: path.to_path_buf(),
        source,
    };

    let mut writer = csv_writer_builder().from_writer(Vec::new());
    for row in rows {
        writer.write_record(&row).map_err(csv_error)?;
    }

    let bytes = writer.into_inner().map_err(|e| WriteError::Io {
        destination: path.to_path_buf(),
        source: e.into_error(),
    })?;
    write_atomically(path, &bytes)?;
    Ok(())
}
