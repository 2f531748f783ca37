use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use mailmerge_prep::config::{LoggingSettings, Settings};
use mailmerge_prep::routes::{self, AppState};
use mailmerge_prep::services::TemplateStore;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialize logging; RUST_LOG takes precedence over the configured level
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    init_tracing(&settings.logging);

    info!("Starting mail merge prep service...");

    let max_connections = settings.database.max_connections.unwrap_or(5);
    let templates = TemplateStore::connect(&settings.database.url, max_connections)
        .await
        .map_err(|e| {
            error!("Failed to open template store: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?;

    if settings.templates.seed_defaults {
        if let Err(e) = templates.seed_defaults().await {
            error!("Failed to seed default templates: {}", e);
        }
    }

    let app_state = AppState {
        templates: Arc::new(templates),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let upload_limit = settings.uploads.max_bytes;

    info!("Starting HTTP server on {}:{} (upload limit {} bytes)", host, port, upload_limit);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config(upload_limit))
            .app_data(routes::multipart_config(upload_limit))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
