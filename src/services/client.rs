use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::core::document::{DOCUMENT_FILENAME, DOCX_CONTENT_TYPE};
use crate::core::emit::{cleaned_filename, CSV_CONTENT_TYPE, MANUAL_DATA_FILENAME};
use crate::error::ErrorKind;
use crate::models::{
    AnalysisResult, Attachment, DocumentRequest, GridUpload, HeadersResponse, Template,
    TemplateDraft, Upload,
};

/// Errors that can occur when calling the service
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with a non-2xx status
    #[error("{message}")]
    Api {
        kind: ErrorKind,
        status: u16,
        message: String,
    },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Api { kind, .. } => *kind,
            ClientError::Transport(_) => ErrorKind::ServerFailure,
        }
    }
}

/// Typed HTTP client for the mail-merge service
///
/// Errors are surfaced once with the server's message; nothing is retried.
#[derive(Debug, Clone)]
pub struct MergeClient {
    http: reqwest::Client,
    base_url: String,
}

impl MergeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub async fn get_headers(&self, upload: &Upload) -> Result<Vec<String>, ClientError> {
        let response = self
            .http
            .post(self.url("/api/get_headers"))
            .multipart(file_form(upload))
            .send()
            .await?;

        let body: HeadersResponse = json(response).await?;
        Ok(body.headers)
    }

    pub async fn analyze_file(
        &self,
        upload: &Upload,
        email_column: &str,
    ) -> Result<AnalysisResult, ClientError> {
        let form = file_form(upload).text("email_column", email_column.to_string());
        let response = self
            .http
            .post(self.url("/api/analyze_file"))
            .multipart(form)
            .send()
            .await?;

        json(response).await
    }

    pub async fn analyze_grid(&self, grid: &GridUpload) -> Result<AnalysisResult, ClientError> {
        let response = self
            .http
            .post(self.url("/api/analyze_grid"))
            .json(grid)
            .send()
            .await?;

        json(response).await
    }

    pub async fn download_cleaned_file(
        &self,
        upload: &Upload,
        email_column: &str,
    ) -> Result<Attachment, ClientError> {
        let form = file_form(upload).text("email_column", email_column.to_string());
        let response = self
            .http
            .post(self.url("/api/download_cleaned_file"))
            .multipart(form)
            .send()
            .await?;

        Ok(Attachment {
            filename: cleaned_filename(&upload.filename),
            content_type: CSV_CONTENT_TYPE,
            bytes: bytes(response).await?,
        })
    }

    pub async fn download_cleaned_grid(&self, grid: &GridUpload) -> Result<Attachment, ClientError> {
        let response = self
            .http
            .post(self.url("/api/download_cleaned_grid"))
            .json(grid)
            .send()
            .await?;

        Ok(Attachment {
            filename: MANUAL_DATA_FILENAME.to_string(),
            content_type: CSV_CONTENT_TYPE,
            bytes: bytes(response).await?,
        })
    }

    pub async fn list_templates(&self) -> Result<Vec<Template>, ClientError> {
        let response = self.http.get(self.url("/api/templates")).send().await?;
        json(response).await
    }

    pub async fn create_template(&self, draft: &TemplateDraft) -> Result<Template, ClientError> {
        let response = self
            .http
            .post(self.url("/api/templates"))
            .json(draft)
            .send()
            .await?;

        json(response).await
    }

    pub async fn update_template(
        &self,
        id: i64,
        draft: &TemplateDraft,
    ) -> Result<Template, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/api/templates/{}", id)))
            .json(draft)
            .send()
            .await?;

        json(response).await
    }

    pub async fn delete_template(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/templates/{}", id)))
            .send()
            .await?;

        check(response).await.map(|_| ())
    }

    pub async fn create_word_doc(&self, body: &str) -> Result<Attachment, ClientError> {
        let response = self
            .http
            .post(self.url("/api/create_word_doc"))
            .json(&DocumentRequest {
                body: body.to_string(),
            })
            .send()
            .await?;

        Ok(Attachment {
            filename: DOCUMENT_FILENAME.to_string(),
            content_type: DOCX_CONTENT_TYPE,
            bytes: bytes(response).await?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn file_form(upload: &Upload) -> Form {
    let part = Part::bytes(upload.bytes.clone()).file_name(upload.filename.clone());
    Form::new().part("file", part)
}

async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(check(response).await?.json().await?)
}

async fn bytes(response: Response) -> Result<Vec<u8>, ClientError> {
    Ok(check(response).await?.bytes().await?.to_vec())
}

/// Pass 2xx responses through; turn anything else into `ClientError::Api`
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await?;
    Err(api_error(status, &body))
}

fn api_error(status: StatusCode, body: &str) -> ClientError {
    // Unknown or absent kinds fall back to ServerFailure
    let message = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        let message = value.get("error")?.as_str()?.to_string();
        let kind = value
            .get("kind")
            .and_then(|kind| serde_json::from_value::<ErrorKind>(kind.clone()).ok())
            .unwrap_or_default();
        Some((kind, message))
    });

    match message {
        Some((kind, message)) => ClientError::Api {
            kind,
            status: status.as_u16(),
            message,
        },
        None => {
            tracing::warn!("Non-JSON error body from server (status {})", status);
            ClientError::Api {
                kind: ErrorKind::ServerFailure,
                status: status.as_u16(),
                message: format!(
                    "Server returned a non-JSON error (status {})",
                    status.as_u16()
                ),
            }
        }
    }
}
