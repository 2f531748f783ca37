// Integration tests for the HTTP API

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use mailmerge_prep::core::extract_text;
use mailmerge_prep::models::{AnalysisResult, HeadersResponse, Template};
use mailmerge_prep::routes::{self, AppState};
use mailmerge_prep::{ErrorKind, TemplateStore};
use serde_json::{json, Value};
use std::sync::Arc;

const BOUNDARY: &str = "mailmergeboundary7MA4YWxk";

async fn app_state() -> AppState {
    AppState {
        templates: Arc::new(TemplateStore::in_memory().await.unwrap()),
    }
}

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(app_state().await))
                .app_data(routes::json_config(1 << 20))
                .app_data(routes::multipart_config(1 << 20))
                .configure(routes::configure_routes),
        )
        .await
    };
}

fn multipart_body(filename: &str, content: &[u8], email_column: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            BOUNDARY, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(b"\r\n");

    if let Some(column) = email_column {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"email_column\"\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{}\r\n",
                BOUNDARY, column
            )
            .as_bytes(),
        );
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(
    uri: &str,
    filename: &str,
    content: &[u8],
    email_column: Option<&str>,
) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(multipart_body(filename, content, email_column))
}

const RECIPIENTS: &[u8] = b"First Name,Email\nAnn,A@x.com\nAnnie,a@x.com\nNobody,\nBob,b@x.com\n";

#[actix_web::test]
async fn test_health() {
    let app = test_app!();
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_get_headers() {
    let app = test_app!();
    let req = upload_request("/api/get_headers", "list.csv", b"State,Email\n", None).to_request();
    let body: HeadersResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.headers, vec!["State", "Email"]);
}

#[actix_web::test]
async fn test_get_headers_unsupported() {
    let app = test_app!();
    let req = upload_request("/api/get_headers", "list.txt", b"State,Email\n", None).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "UnsupportedFormat");
    assert!(body["error"].as_str().unwrap().contains("list.txt"));
}

#[actix_web::test]
async fn test_get_headers_empty_file() {
    let app = test_app!();
    let req = upload_request("/api/get_headers", "list.csv", b"", None).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "EmptyFile");
}

#[actix_web::test]
async fn test_analyze_file() {
    let app = test_app!();
    let req = upload_request("/api/analyze_file", "list.csv", RECIPIENTS, Some("Email")).to_request();
    let result: AnalysisResult = test::call_and_read_body_json(&app, req).await;

    assert_eq!(result.metrics.original_rows, 4);
    assert_eq!(result.metrics.removed_count, 1);
    assert_eq!(result.metrics.final_rows, 2);
    assert_eq!(result.metrics.missing_count, 1);
    assert_eq!(result.removed_duplicates.iter().collect::<Vec<_>>(), vec!["a@x.com"]);
    assert_eq!(result.headers, vec!["First Name", "Email"]);
}

#[actix_web::test]
async fn test_analyze_file_missing_column_field() {
    let app = test_app!();
    let req = upload_request("/api/analyze_file", "list.csv", RECIPIENTS, None).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation failed: Email column not specified");
}

#[actix_web::test]
async fn test_analyze_file_unknown_column() {
    let app = test_app!();
    let req = upload_request("/api/analyze_file", "list.csv", RECIPIENTS, Some("BCRI Email:")).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "ColumnNotFound");
}

#[actix_web::test]
async fn test_download_cleaned_file() {
    let app = test_app!();
    let req = upload_request("/api/download_cleaned_file", "list.csv", RECIPIENTS, Some("Email")).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("cleaned_list.csv"));

    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"First Name,Email\nAnn,A@x.com\nBob,b@x.com\n");
}

#[actix_web::test]
async fn test_cleaned_file_matches_analysis() {
    let app = test_app!();

    let req = upload_request("/api/analyze_file", "list.csv", RECIPIENTS, Some("Email")).to_request();
    let result: AnalysisResult = test::call_and_read_body_json(&app, req).await;

    let req = upload_request("/api/download_cleaned_file", "list.csv", RECIPIENTS, Some("Email")).to_request();
    let first = test::call_and_read_body(&app, req).await;
    let req = upload_request("/api/download_cleaned_file", "list.csv", RECIPIENTS, Some("Email")).to_request();
    let second = test::call_and_read_body(&app, req).await;

    assert_eq!(first, second);
    let data_lines = first.split(|&b| b == b'\n').filter(|l| !l.is_empty()).count() - 1;
    assert_eq!(data_lines, result.metrics.final_rows);
}

#[actix_web::test]
async fn test_grid_endpoints() {
    let app = test_app!();
    let grid = json!({
        "email_column": "Email",
        "grid_data": [
            {"First Name": "Ann", "Email": "ann@x.com"},
            {"First Name": "Ann", "Email": " ANN@x.com"},
            {"First Name": "Cy", "Email": "cy@x.com"}
        ]
    });

    let req = test::TestRequest::post()
        .uri("/api/analyze_grid")
        .set_json(&grid)
        .to_request();
    let result: AnalysisResult = test::call_and_read_body_json(&app, req).await;
    assert_eq!(result.metrics.final_rows, 2);
    assert_eq!(result.headers, vec!["First Name", "Email"]);

    let req = test::TestRequest::post()
        .uri("/api/download_cleaned_grid")
        .set_json(&grid)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let disposition = resp.headers().get(header::CONTENT_DISPOSITION).unwrap();
    assert!(disposition.to_str().unwrap().contains("cleaned_manual_data.csv"));

    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"First Name,Email\nAnn,ann@x.com\nCy,cy@x.com\n");
}

#[actix_web::test]
async fn test_template_spreadsheet() {
    let app = test_app!();
    let req = test::TestRequest::get().uri("/api/template_spreadsheet").to_request();
    let body = test::call_and_read_body(&app, req).await;

    assert_eq!(
        &body[..],
        b"Primary State,First Name,Last Name,Primary Practice Name,Email,BCRI Email:,Devtracker ID\n"
    );
}

#[actix_web::test]
async fn test_template_lifecycle() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/templates")
        .set_json(json!({"title": "Welcome", "subject": "Hi", "body": "Dear {name}"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Template = test::read_body_json(resp).await;
    assert_eq!(created.title, "Welcome");
    assert_eq!(created.subject, "Hi");
    assert_eq!(created.body, "Dear {name}");

    let req = test::TestRequest::get().uri("/api/templates").to_request();
    let listed: Vec<Template> = test::call_and_read_body_json(&app, req).await;
    assert!(listed.contains(&created));

    let req = test::TestRequest::put()
        .uri(&format!("/api/templates/{}", created.id))
        .set_json(json!({"id": created.id, "title": "Welcome back", "subject": "Hello", "body": "Dear {First Name}"}))
        .to_request();
    let updated: Template = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Welcome back");

    let req = test::TestRequest::get()
        .uri(&format!("/api/templates/{}", created.id))
        .to_request();
    let fetched: Template = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, updated);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/templates/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/api/templates").to_request();
    let listed: Vec<Template> = test::call_and_read_body_json(&app, req).await;
    assert!(listed.iter().all(|t| t.id != created.id));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/templates/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "NotFound");
}

#[actix_web::test]
async fn test_update_missing_template() {
    let app = test_app!();
    let req = test::TestRequest::put()
        .uri("/api/templates/999")
        .set_json(json!({"title": "T", "subject": "S", "body": "B"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_create_template_missing_fields() {
    let app = test_app!();
    let req = test::TestRequest::post()
        .uri("/api/templates")
        .set_json(json!({"title": "Only a title"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "ValidationError");
}

#[actix_web::test]
async fn test_malformed_json_is_reported_as_json() {
    let app = test_app!();
    let req = test::TestRequest::post()
        .uri("/api/templates")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Validation failed: Invalid JSON"));
}

#[actix_web::test]
async fn test_create_word_doc() {
    let app = test_app!();
    let req = test::TestRequest::post()
        .uri("/api/create_word_doc")
        .set_json(json!({"body": "Hello {First Name}"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    let disposition = resp.headers().get(header::CONTENT_DISPOSITION).unwrap();
    assert!(disposition.to_str().unwrap().contains("mail_merge_template.docx"));

    let body = test::read_body(resp).await;
    assert_eq!(extract_text(&body).unwrap(), "Hello {First Name}");
}

#[actix_web::test]
async fn test_create_word_doc_render_error() {
    let app = test_app!();
    let req = test::TestRequest::post()
        .uri("/api/create_word_doc")
        .set_json(json!({"body": "null \u{0000} byte"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], serde_json::to_value(ErrorKind::RenderError).unwrap());
}
