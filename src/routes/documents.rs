use actix_web::{web, HttpResponse};

use crate::core::document_attachment;
use crate::error::MergeError;
use crate::models::DocumentRequest;
use crate::routes::attachment_response;

/// Configure document routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/create_word_doc", web::post().to(create_word_doc));
}

/// POST /api/create_word_doc
///
/// Request body: `{"body": "Dear {First Name}, ..."}`. Answers with
/// `mail_merge_template.docx`.
async fn create_word_doc(req: web::Json<DocumentRequest>) -> Result<HttpResponse, MergeError> {
    let attachment = document_attachment(&req.body)?;
    Ok(attachment_response(attachment))
}
