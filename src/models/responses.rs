use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// Response for header extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadersResponse {
    pub headers: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub kind: ErrorKind,
    #[serde(default)]
    pub status_code: u16,
}
