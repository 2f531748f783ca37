use crate::core::dedup::{deduplicate, Deduplication};
use crate::core::table::{parse_table, table_from_grid};
use crate::error::{MergeError, Result};
use crate::models::{Attachment, GridUpload, Upload, UploadedTable};

pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Filename used for cleaned grid input
pub const MANUAL_DATA_FILENAME: &str = "cleaned_manual_data.csv";

/// Header row of the blank recipient spreadsheet offered for download
pub const TEMPLATE_SPREADSHEET_HEADERS: [&str; 7] = [
    "Primary State",
    "First Name",
    "Last Name",
    "Primary Practice Name",
    "Email",
    "BCRI Email:",
    "Devtracker ID",
];

pub const TEMPLATE_SPREADSHEET_FILENAME: &str = "mail_merge_template.csv";

/// `cleaned_<stem>.csv` for an uploaded filename
///
/// Directory components (either separator) and the last extension are dropped.
pub fn cleaned_filename(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let stem = match base.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => base,
    };
    let stem = if stem.is_empty() { "data" } else { stem };

    format!("cleaned_{}.csv", stem)
}

/// Write the header row and the retained rows as CSV
///
/// Every record is padded to the header width.
pub fn write_cleaned_csv(table: &UploadedTable, dedup: &Deduplication) -> Result<Vec<u8>> {
    let width = table.headers.len();
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for &row in &dedup.retained {
        writer.write_record((0..width).map(|column| table.cell(row, column)))?;
    }

    finish(writer)
}

/// Deduplicate an uploaded spreadsheet and return it as a cleaned CSV
pub fn cleaned_upload(upload: &Upload, email_column: &str) -> Result<Attachment> {
    let table = parse_table(upload)?;
    cleaned_table(&table, email_column, cleaned_filename(&upload.filename))
}

/// Deduplicate grid rows and return them as a cleaned CSV
pub fn cleaned_grid(grid: &GridUpload) -> Result<Attachment> {
    let table = table_from_grid(grid);
    cleaned_table(&table, &grid.email_column, MANUAL_DATA_FILENAME.to_string())
}

pub fn cleaned_table(
    table: &UploadedTable,
    email_column: &str,
    filename: String,
) -> Result<Attachment> {
    let dedup = deduplicate(table, email_column)?;
    let bytes = write_cleaned_csv(table, &dedup)?;

    tracing::info!(
        "Emitting {} with {} of {} rows",
        filename,
        dedup.final_rows(),
        dedup.original_rows
    );

    Ok(Attachment {
        filename,
        content_type: CSV_CONTENT_TYPE,
        bytes,
    })
}

/// One-line CSV holding the blank recipient spreadsheet headers
pub fn blank_template_spreadsheet() -> Result<Attachment> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(TEMPLATE_SPREADSHEET_HEADERS)?;
    let bytes = finish(writer)?;

    Ok(Attachment {
        filename: TEMPLATE_SPREADSHEET_FILENAME.to_string(),
        content_type: CSV_CONTENT_TYPE,
        bytes,
    })
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer.into_inner().map_err(|e| {
        let err = e.error();
        MergeError::Io(std::io::Error::new(err.kind(), err.to_string()))
    })
}
