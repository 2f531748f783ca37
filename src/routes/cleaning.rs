use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm};
use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::core::{
    analyze, blank_template_spreadsheet, cleaned_grid, cleaned_upload, parse_table,
    read_headers, table_from_grid,
};
use crate::error::MergeError;
use crate::models::{GridUpload, HeadersResponse, Upload};
use crate::routes::attachment_response;

/// Configure list-cleaning routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/get_headers", web::post().to(get_headers))
        .route("/analyze_file", web::post().to(analyze_file))
        .route("/analyze_grid", web::post().to(analyze_grid))
        .route("/download_cleaned_file", web::post().to(download_cleaned_file))
        .route("/download_cleaned_grid", web::post().to(download_cleaned_grid))
        .route("/template_spreadsheet", web::get().to(template_spreadsheet));
}

/// Multipart body shared by the file endpoints
#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    pub file: Bytes,
    pub email_column: Option<Text<String>>,
}

impl UploadForm {
    fn upload(&self) -> Upload {
        Upload::new(
            self.file.file_name.clone().unwrap_or_default(),
            self.file.data.to_vec(),
        )
    }

    fn email_column(&self) -> Result<&str, MergeError> {
        self.email_column
            .as_ref()
            .map(|c| c.as_str())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| MergeError::Validation("Email column not specified".to_string()))
    }
}

/// POST /api/get_headers
///
/// Multipart field `file` (.csv or .xlsx). Returns `{"headers": [...]}`.
async fn get_headers(MultipartForm(form): MultipartForm<UploadForm>) -> Result<HttpResponse, MergeError> {
    let upload = form.upload();
    let headers = read_headers(&upload)?;

    tracing::debug!("Extracted {} headers from {}", headers.len(), upload.filename);

    Ok(HttpResponse::Ok().json(HeadersResponse { headers }))
}

/// POST /api/analyze_file
///
/// Multipart fields `file` and `email_column`. Returns the analysis result.
async fn analyze_file(MultipartForm(form): MultipartForm<UploadForm>) -> Result<HttpResponse, MergeError> {
    let email_column = form.email_column()?;
    let table = parse_table(&form.upload())?;
    let result = analyze(&table, email_column)?;

    Ok(HttpResponse::Ok().json(result))
}

/// POST /api/analyze_grid
async fn analyze_grid(grid: web::Json<GridUpload>) -> Result<HttpResponse, MergeError> {
    grid.validate()?;
    let table = table_from_grid(&grid);
    let result = analyze(&table, &grid.email_column)?;

    Ok(HttpResponse::Ok().json(result))
}

/// POST /api/download_cleaned_file
///
/// Same fields as `analyze_file`; answers with `cleaned_<name>.csv`.
async fn download_cleaned_file(
    MultipartForm(form): MultipartForm<UploadForm>,
) -> Result<HttpResponse, MergeError> {
    let email_column = form.email_column()?;
    let attachment = cleaned_upload(&form.upload(), email_column)?;

    Ok(attachment_response(attachment))
}

/// POST /api/download_cleaned_grid
async fn download_cleaned_grid(grid: web::Json<GridUpload>) -> Result<HttpResponse, MergeError> {
    grid.validate()?;
    let attachment = cleaned_grid(&grid)?;

    Ok(attachment_response(attachment))
}

/// GET /api/template_spreadsheet
async fn template_spreadsheet() -> Result<HttpResponse, MergeError> {
    Ok(attachment_response(blank_template_spreadsheet()?))
}
