use crate::core::dedup::analyze;
use crate::core::emit::{cleaned_filename, cleaned_table};
use crate::core::table::parse_table;
use crate::error::{MergeError, Result};
use crate::models::{AnalysisResult, Attachment, Upload, UploadedTable};

/// Caller-owned state for one pass through the cleaning wizard
///
/// Holds the upload, the chosen email column and the latest analysis so
/// that each stage only depends on what the caller has put in.
#[derive(Debug, Clone)]
pub struct MergeSession {
    upload: Upload,
    table: Option<UploadedTable>,
    email_column: Option<String>,
    analysis: Option<AnalysisResult>,
}

impl MergeSession {
    pub fn new(upload: Upload) -> Self {
        Self {
            upload,
            table: None,
            email_column: None,
            analysis: None,
        }
    }

    pub fn upload(&self) -> &Upload {
        &self.upload
    }

    /// Column names of the upload, parsed on first use
    pub fn headers(&mut self) -> Result<&[String]> {
        Ok(&self.table()?.headers)
    }

    /// Choose the email column; clears any earlier analysis
    pub fn select_column(&mut self, name: &str) -> Result<()> {
        if !self.headers()?.iter().any(|h| h == name) {
            return Err(MergeError::ColumnNotFound(name.to_string()));
        }

        self.email_column = Some(name.to_string());
        self.analysis = None;
        Ok(())
    }

    pub fn email_column(&self) -> Option<&str> {
        self.email_column.as_deref()
    }

    pub fn analyze(&mut self) -> Result<&AnalysisResult> {
        let column = self.selected_column()?;
        let result = analyze(self.table()?, &column)?;
        Ok(self.analysis.insert(result))
    }

    /// Most recent analysis for the selected column, if any
    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn cleaned_file(&mut self) -> Result<Attachment> {
        let column = self.selected_column()?;
        let filename = cleaned_filename(&self.upload.filename);
        cleaned_table(self.table()?, &column, filename)
    }

    fn selected_column(&self) -> Result<String> {
        self.email_column
            .clone()
            .ok_or_else(|| MergeError::Validation("no email column selected".to_string()))
    }

    fn table(&mut self) -> Result<&UploadedTable> {
        let table = match self.table.take() {
            Some(table) => table,
            None => parse_table(&self.upload)?,
        };
        Ok(self.table.insert(table))
    }
}
