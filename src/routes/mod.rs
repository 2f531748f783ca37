// Route exports
pub mod cleaning;
pub mod documents;
pub mod templates;

use actix_multipart::form::MultipartFormConfig;
use actix_multipart::MultipartError;
use actix_web::{error, web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;

use crate::error::MergeError;
use crate::models::{Attachment, HealthResponse};
use crate::services::TemplateStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub templates: Arc<TemplateStore>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health_check))
            .configure(cleaning::configure)
            .configure(templates::configure)
            .configure(documents::configure),
    );
}

/// JSON extractor settings answering malformed bodies with an error payload
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(handle_json_payload_error)
}

/// Multipart settings bounding upload size
pub fn multipart_config(limit: usize) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(limit)
        .memory_limit(limit)
        .error_handler(handle_multipart_error)
}

/// Handle JSON payload errors
fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    MergeError::Validation(format!("Invalid JSON: {}", err)).into()
}

/// Handle multipart form errors (missing file, oversized upload)
fn handle_multipart_error(err: MultipartError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Multipart error on {}: {}", req.path(), err);
    MergeError::Validation(format!("Invalid upload: {}", err)).into()
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.templates.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Send a generated file as a download
pub(crate) fn attachment_response(attachment: Attachment) -> HttpResponse {
    use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};

    HttpResponse::Ok()
        .content_type(attachment.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(attachment.filename)],
        })
        .body(attachment.bytes)
}
