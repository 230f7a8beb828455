//! Record and dataset types shared by the crawler, writer and analysis passes

/// One extracted quote
///
/// Fields are never absent: a quote container that lacks its text or author
/// yields an empty string rather than being dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// The quoted text
    pub text: String,

    /// The author's display name
    pub author: String,

    /// Tag labels in source order, duplicates preserved
    pub tags: Vec<String>,
}

impl Record {
    /// Creates a record from its three fields
    pub fn new(text: impl Into<String>, author: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            tags,
        }
    }

    /// Returns the tags joined with the dataset's tag delimiter
    pub fn joined_tags(&self) -> String {
        self.tags.join(TAG_DELIMITER)
    }
}

/// Delimiter used to join tags into the single `tags` column
pub const TAG_DELIMITER: &str = ",";

/// The ordered collection of records gathered over a crawl
///
/// Records are appended in page-visit order, then in-page order. Nothing is
/// ever removed or reordered once appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Creates an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every record of one page, preserving their order
    pub fn extend_page(&mut self, records: Vec<Record>) {
        self.records.extend(records);
    }

    /// Number of records collected so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
