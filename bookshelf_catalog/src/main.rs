use std::sync::Arc;

use actix_web::{App, HttpServer};
use anyhow::Context;
use paperclip::actix::{web, OpenApiExt};
use tracing_actix_web::TracingLogger;

use bookshelf_catalog::app_config::{config_app, json_config};
use bookshelf_catalog::books_repository::{
    BookRepository, InMemoryBookRepository, PostgresBooksRepository,
    PostgresBooksRepositoryConfig,
};
use bookshelf_catalog::settings::{Settings, StorageSettings};
use bookshelf_catalog::telemetry::init_telemetry;

const APP_NAME: &str = "bookshelf_catalog";

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    init_telemetry(APP_NAME, settings.export_traces)?;

    // Built once and shared by every worker
    let books_repository: Arc<dyn BookRepository> = match settings.storage()? {
        StorageSettings::InMemory => {
            tracing::warn!("Using in-memory storage, books are lost on restart");
            Arc::new(InMemoryBookRepository::default())
        }
        StorageSettings::Postgres { database_url } => Arc::new(
            PostgresBooksRepository::init(PostgresBooksRepositoryConfig { database_url })
                .await
                .context("Failed to init postgres")?,
        ),
    };

    tracing::info!(
        "starting HTTP server at http://{}:{}",
        settings.host,
        settings.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap_api()
            .app_data(web::Data::new(books_repository.clone()))
            .app_data(json_config())
            .wrap(TracingLogger::default())
            .configure(config_app)
            .with_json_spec_at("/apispec/v2")
            .build()
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await?;

    Ok(())
}
