use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Error taxonomy shared by the server and the API client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ErrorKind {
    UnsupportedFormat,
    ParseError,
    EmptyFile,
    ColumnNotFound,
    NotFound,
    RenderError,
    ValidationError,
    #[default]
    ServerFailure,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::UnsupportedFormat
            | ErrorKind::ColumnNotFound
            | ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::ParseError | ErrorKind::EmptyFile | ErrorKind::RenderError => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::ServerFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors raised while cleaning lists, storing templates or rendering documents
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Unsupported file type '{0}'. Please use CSV or XLSX.")]
    UnsupportedFormat(String),

    #[error("Could not read file: {0}")]
    Parse(String),

    #[error("The uploaded file has no header row")]
    EmptyFile,

    #[error("The selected column '{0}' was not found in the data.")]
    ColumnNotFound(String),

    #[error("Template {0} not found")]
    NotFound(i64),

    #[error("Could not create document: {0}")]
    Render(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MergeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MergeError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            MergeError::Parse(_) => ErrorKind::ParseError,
            MergeError::EmptyFile => ErrorKind::EmptyFile,
            MergeError::ColumnNotFound(_) => ErrorKind::ColumnNotFound,
            MergeError::NotFound(_) => ErrorKind::NotFound,
            MergeError::Render(_) => ErrorKind::RenderError,
            MergeError::Validation(_) => ErrorKind::ValidationError,
            MergeError::Database(_) | MergeError::Migrate(_) | MergeError::Io(_) => {
                ErrorKind::ServerFailure
            }
        }
    }
}

impl From<csv::Error> for MergeError {
    fn from(err: csv::Error) -> Self {
        MergeError::Parse(err.to_string())
    }
}

impl From<validator::ValidationErrors> for MergeError {
    fn from(errors: validator::ValidationErrors) -> Self {
        MergeError::Validation(errors.to_string())
    }
}

impl ResponseError for MergeError {
    fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::info!("Request rejected ({}): {}", status.as_u16(), self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.to_string(),
            kind: self.kind(),
            status_code: status.as_u16(),
        })
    }
}

pub type Result<T, E = MergeError> = std::result::Result<T, E>;
