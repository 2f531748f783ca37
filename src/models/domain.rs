use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A file as received from the caller: declared name plus raw bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// Parsed spreadsheet held for the duration of one request
///
/// Rows are positional and aligned with `headers`; a short row reads as
/// empty for the columns it lacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl UploadedTable {
    /// Position of the first column carrying `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Counts produced by the recipient analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisMetrics {
    pub original_rows: usize,
    pub removed_count: usize,
    pub final_rows: usize,
    /// Rows whose email cell was empty after normalization
    pub missing_count: usize,
}

/// Outcome of deduplicating a recipient list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub metrics: AnalysisMetrics,
    /// Distinct canonical emails that appeared more than once
    pub removed_duplicates: BTreeSet<String>,
    pub headers: Vec<String>,
}

/// Stored email template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Template {
    pub id: i64,
    pub title: String,
    pub subject: String,
    pub body: String,
}

/// A generated file ready to be sent as an attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}
