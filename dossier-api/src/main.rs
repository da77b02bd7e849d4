use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use dossier_api::config::ApiConfig;
use dossier_api::handlers;
use dossier_api::helpers::database::initialize_database;
use dossier_api::helpers::logging::init_tracing;
use dossier_api::sessions::ChoiceSessions;
use dossier_api::storage::SqliteProjectStore;
use dossier_engine::{ChoiceSettings, DossierEngine, Generator, ModuleCatalog};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the API config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (config, config_path) = ApiConfig::load(args.config.as_deref())
        .context("Failed to load API configuration")?;
    let _log_guard = init_tracing(config.logging.as_ref())?;
    info!(path = %config_path.display(), "Configuration loaded");

    let db = initialize_database(&config.database.path)?;
    let store = Arc::new(SqliteProjectStore::new(db));

    let catalog = match &config.engine.catalog_path {
        Some(path) => ModuleCatalog::load(path)?,
        None => ModuleCatalog::builtin(),
    };
    info!(modules = catalog.len(), "Module catalog ready");

    let generator = Generator::from_settings(&config.llm)?;
    let engine = DossierEngine::new(store, Arc::new(catalog), generator)
        .with_choice_settings(ChoiceSettings::from(&config.engine));

    let engine = web::Data::new(engine);
    let sessions = web::Data::new(ChoiceSessions::from(&config.engine));
    let allowed_origins = config
        .cors
        .map(|cors| cors.allowed_origins)
        .unwrap_or_default();

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting dossier-api server at http://{}", bind_addr);

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(engine.clone())
            .app_data(sessions.clone())
            .configure(handlers::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
