use std::collections::{BTreeSet, HashSet};

use crate::error::{MergeError, Result};
use crate::models::{AnalysisMetrics, AnalysisResult, UploadedTable};

/// Normalize a raw cell into the deduplication key
///
/// Returns `None` when nothing is left after trimming.
#[inline]
pub fn canonical_email(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Which rows of a table survive deduplication, and why the others did not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deduplication {
    /// Indices of retained rows, in original order
    pub retained: Vec<usize>,
    pub original_rows: usize,
    /// Later occurrences of an already-seen email
    pub removed_count: usize,
    /// Rows with an empty email cell
    pub missing_count: usize,
    pub removed_duplicates: BTreeSet<String>,
}

impl Deduplication {
    pub fn final_rows(&self) -> usize {
        self.retained.len()
    }

    pub fn metrics(&self) -> AnalysisMetrics {
        AnalysisMetrics {
            original_rows: self.original_rows,
            removed_count: self.removed_count,
            final_rows: self.final_rows(),
            missing_count: self.missing_count,
        }
    }
}

/// Keep the first row for each canonical email in `email_column`
///
/// Rows without an email are dropped without being counted as duplicates.
pub fn deduplicate(table: &UploadedTable, email_column: &str) -> Result<Deduplication> {
    let column = table
        .column_index(email_column)
        .ok_or_else(|| MergeError::ColumnNotFound(email_column.to_string()))?;

    let original_rows = table.row_count();
    let mut seen: HashSet<String> = HashSet::with_capacity(original_rows);
    let mut dedup = Deduplication {
        retained: Vec::with_capacity(original_rows),
        original_rows,
        removed_count: 0,
        missing_count: 0,
        removed_duplicates: BTreeSet::new(),
    };

    for row in 0..original_rows {
        match canonical_email(table.cell(row, column)) {
            None => dedup.missing_count += 1,
            Some(email) if seen.contains(&email) => {
                dedup.removed_count += 1;
                dedup.removed_duplicates.insert(email);
            }
            Some(email) => {
                seen.insert(email);
                dedup.retained.push(row);
            }
        }
    }

    debug_assert_eq!(
        dedup.original_rows,
        dedup.final_rows() + dedup.removed_count + dedup.missing_count
    );

    Ok(dedup)
}

/// Summarize deduplication of `table` on `email_column`
pub fn analyze(table: &UploadedTable, email_column: &str) -> Result<AnalysisResult> {
    let dedup = deduplicate(table, email_column)?;

    tracing::info!(
        "Analyzed '{}': {} rows, {} duplicates removed, {} missing, {} kept",
        email_column,
        dedup.original_rows,
        dedup.removed_count,
        dedup.missing_count,
        dedup.final_rows()
    );

    Ok(AnalysisResult {
        metrics: dedup.metrics(),
        removed_duplicates: dedup.removed_duplicates,
        headers: table.headers.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_table(emails: &[&str]) -> UploadedTable {
        UploadedTable {
            headers: vec!["Name".into(), "Email".into()],
            rows: emails
                .iter()
                .enumerate()
                .map(|(i, e)| vec![format!("Person {}", i), e.to_string()])
                .collect(),
        }
    }

    #[test]
    fn test_canonical_email() {
        assert_eq!(canonical_email("  Ann@X.com "), Some("ann@x.com".to_string()));
        assert_eq!(canonical_email("   "), None);
        assert_eq!(canonical_email(""), None);
    }

    #[test]
    fn test_reference_example() {
        let table = email_table(&["A@x.com", "a@x.com", "", "b@x.com"]);
        let result = analyze(&table, "Email").unwrap();

        assert_eq!(result.metrics.original_rows, 4);
        assert_eq!(result.metrics.removed_count, 1);
        assert_eq!(result.metrics.final_rows, 2);
        assert_eq!(result.metrics.missing_count, 1);
        assert_eq!(
            result.removed_duplicates.into_iter().collect::<Vec<_>>(),
            vec!["a@x.com"]
        );
        assert_eq!(result.headers, vec!["Name", "Email"]);
    }

    #[test]
    fn test_first_occurrence_is_kept() {
        let table = email_table(&["b@x.com", "a@x.com", " B@X.COM", "a@x.com", "c@x.com"]);
        let dedup = deduplicate(&table, "Email").unwrap();

        assert_eq!(dedup.retained, vec![0, 1, 4]);
    }

    #[test]
    fn test_removed_count_counts_occurrences() {
        let table = email_table(&["a@x.com", "a@x.com", "A@x.com", "b@x.com", "b@x.com"]);
        let dedup = deduplicate(&table, "Email").unwrap();

        assert_eq!(dedup.removed_count, 3);
        assert_eq!(dedup.removed_duplicates.len(), 2);
    }

    #[test]
    fn test_unknown_column() {
        let table = email_table(&["a@x.com"]);
        let err = deduplicate(&table, "BCRI Email:").unwrap_err();

        assert!(matches!(err, MergeError::ColumnNotFound(c) if c == "BCRI Email:"));
    }

    #[test]
    fn test_counts_always_balance() {
        let cases: Vec<Vec<&str>> = vec![
            vec![],
            vec!["", " ", "\t"],
            vec!["x@y.z"; 10],
            vec!["a@x.com", "", "A@X.COM", "b@x.com", " ", "b@x.com "],
        ];

        for emails in cases {
            let metrics = deduplicate(&email_table(&emails), "Email").unwrap().metrics();
            assert_eq!(
                metrics.original_rows,
                metrics.final_rows + metrics.removed_count + metrics.missing_count,
                "unbalanced for {:?}",
                emails
            );
        }
    }
}
