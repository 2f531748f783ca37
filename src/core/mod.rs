// Core pipeline exports
pub mod dedup;
pub mod document;
pub mod emit;
pub mod session;
pub mod table;

pub use dedup::{analyze, canonical_email, deduplicate, Deduplication};
pub use document::{document_attachment, extract_text, render_document};
pub use emit::{blank_template_spreadsheet, cleaned_filename, cleaned_grid, cleaned_upload};
pub use session::MergeSession;
pub use table::{parse_table, read_headers, table_from_grid, FileFormat};
