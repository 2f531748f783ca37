//! Mail Merge Prep - recipient list cleaning and email template service
//!
//! This library deduplicates recipient spreadsheets by a canonical email key,
//! emits cleaned CSV files, stores reusable email templates and renders them
//! as Word documents for a mail merge done in office software.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{analyze, canonical_email, deduplicate, parse_table, read_headers, MergeSession};
pub use error::{ErrorKind, MergeError};
pub use models::{AnalysisMetrics, AnalysisResult, Template, TemplateDraft, Upload, UploadedTable};
pub use services::{ClientError, MergeClient, TemplateStore};
