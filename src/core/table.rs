use calamine::{Data, Range, Reader, Xlsx};
use chrono::NaiveTime;
use csv::{ReaderBuilder, StringRecord};
use serde_json::Value;
use std::borrow::Cow;
use std::io::Cursor;

use crate::error::{MergeError, Result};
use crate::models::{GridUpload, Upload, UploadedTable};

/// Spreadsheet formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Pick the format from the declared filename's extension
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(FileFormat::Csv),
            Some("xlsx") => Ok(FileFormat::Xlsx),
            _ => Err(MergeError::UnsupportedFormat(filename.to_string())),
        }
    }
}

/// Read only the header row of an upload
pub fn read_headers(upload: &Upload) -> Result<Vec<String>> {
    let headers = match FileFormat::from_filename(&upload.filename)? {
        FileFormat::Csv => {
            let text = decode_text(&upload.bytes);
            let mut reader = csv_reader(&text);
            record_to_vec(reader.headers()?)
        }
        FileFormat::Xlsx => {
            let range = first_worksheet(&upload.bytes)?;
            range
                .rows()
                .next()
                .map(|row| row.iter().map(cell_text).collect())
                .unwrap_or_default()
        }
    };

    ensure_header_row(headers)
}

/// Parse a whole upload into headers and data rows
pub fn parse_table(upload: &Upload) -> Result<UploadedTable> {
    let table = match FileFormat::from_filename(&upload.filename)? {
        FileFormat::Csv => parse_csv(&upload.bytes)?,
        FileFormat::Xlsx => parse_xlsx(&upload.bytes)?,
    };

    tracing::debug!(
        "Parsed '{}': {} columns, {} data rows",
        upload.filename,
        table.headers.len(),
        table.row_count()
    );

    Ok(table)
}

/// Build a table from rows entered in a grid
///
/// Column order comes from `grid.headers` when given, otherwise from the
/// order in which keys first appear across the rows.
pub fn table_from_grid(grid: &GridUpload) -> UploadedTable {
    let headers = match &grid.headers {
        Some(headers) => headers.clone(),
        None => {
            let mut headers: Vec<String> = Vec::new();
            for key in grid.grid_data.iter().flat_map(|row| row.keys()) {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
            headers
        }
    };

    let mut table = UploadedTable {
        headers,
        rows: Vec::with_capacity(grid.grid_data.len()),
    };

    for row in &grid.grid_data {
        let cells = table
            .headers
            .iter()
            .map(|h| row.get(h).map(json_cell).unwrap_or_default())
            .collect();
        push_row(&mut table, cells);
    }

    table
}

fn parse_csv(bytes: &[u8]) -> Result<UploadedTable> {
    let text = decode_text(bytes);
    let mut reader = csv_reader(&text);
    let headers = ensure_header_row(record_to_vec(reader.headers()?))?;
    let width = headers.len();

    let mut table = UploadedTable {
        headers,
        rows: Vec::new(),
    };

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let mut cells = record_to_vec(&record);

        // Trailing empty fields past the header width are tolerated
        if cells.len() > width {
            if cells[width..].iter().any(|c| !c.is_empty()) {
                return Err(MergeError::Parse(format!(
                    "row {} has {} fields but the header has {}",
                    index + 2,
                    cells.len(),
                    width
                )));
            }
            cells.truncate(width);
        }

        push_row(&mut table, cells);
    }

    Ok(table)
}

fn parse_xlsx(bytes: &[u8]) -> Result<UploadedTable> {
    let range = first_worksheet(bytes)?;
    let mut rows = range.rows();

    let headers = ensure_header_row(
        rows.next()
            .map(|row| row.iter().map(cell_text).collect())
            .unwrap_or_default(),
    )?;

    let mut table = UploadedTable {
        headers,
        rows: Vec::with_capacity(range.height().saturating_sub(1)),
    };

    for row in rows {
        push_row(&mut table, row.iter().map(cell_text).collect());
    }

    Ok(table)
}

fn first_worksheet(bytes: &[u8]) -> Result<Range<Data>> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| MergeError::Parse(e.to_string()))?;

    match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| MergeError::Parse(e.to_string())),
        None => Err(MergeError::EmptyFile),
    }
}

/// UTF-8 (BOM stripped) when valid, ISO-8859-1 otherwise
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| b as char).collect()),
    }
}

fn csv_reader(text: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes())
}

fn record_to_vec(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}

fn ensure_header_row(headers: Vec<String>) -> Result<Vec<String>> {
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(MergeError::EmptyFile);
    }
    Ok(headers)
}

fn push_row(table: &mut UploadedTable, cells: Vec<String>) {
    if cells.iter().any(|c| !c.is_empty()) {
        table.rows.push(cells);
    }
}

/// Display form of a worksheet cell
///
/// Dates become ISO 8601 (`2024-03-15`, or `2024-03-15 09:30:00` when a time
/// is present), durations `H:MM:SS`, booleans `TRUE`/`FALSE`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(dt) if dt.is_duration() => match dt.as_duration() {
            Some(duration) => format_duration(duration),
            None => dt.to_string(),
        },
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) if datetime.time() == NaiveTime::MIN => {
                datetime.format("%Y-%m-%d").to_string()
            }
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.to_string(),
        },
        other => other.to_string(),
    }
}

fn format_duration(duration: chrono::Duration) -> String {
    let seconds = duration.num_seconds();
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.unsigned_abs();
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    )
}

fn json_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
