use actix_web::{web, HttpResponse};

use crate::error::MergeError;
use crate::models::TemplateDraft;
use crate::routes::AppState;

/// Configure template CRUD routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/templates", web::get().to(list_templates))
        .route("/templates", web::post().to(create_template))
        .route("/templates/{id}", web::get().to(get_template))
        .route("/templates/{id}", web::put().to(update_template))
        .route("/templates/{id}", web::delete().to(delete_template));
}

/// GET /api/templates
async fn list_templates(state: web::Data<AppState>) -> Result<HttpResponse, MergeError> {
    let templates = state.templates.list().await?;
    Ok(HttpResponse::Ok().json(templates))
}

/// GET /api/templates/{id}
async fn get_template(
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, MergeError> {
    let template = state.templates.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(template))
}

/// POST /api/templates
///
/// Request body:
/// ```json
/// {"title": "Welcome", "subject": "Hi", "body": "Dear {name}"}
/// ```
async fn create_template(
    state: web::Data<AppState>,
    draft: web::Json<TemplateDraft>,
) -> Result<HttpResponse, MergeError> {
    let template = state.templates.create(&draft).await?;

    tracing::info!("Created template {} '{}'", template.id, template.title);

    Ok(HttpResponse::Created().json(template))
}

/// PUT /api/templates/{id}
async fn update_template(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    draft: web::Json<TemplateDraft>,
) -> Result<HttpResponse, MergeError> {
    let template = state.templates.update(id.into_inner(), &draft).await?;
    Ok(HttpResponse::Ok().json(template))
}

/// DELETE /api/templates/{id}
async fn delete_template(
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, MergeError> {
    state.templates.delete(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
