use std::path::Path;
use std::sync::Arc;

use crate::academy::{Academy, AcademySettings};
use crate::catalog::Catalog;
use crate::config::StorageKind;
use crate::model::{DbConnection, ModelManager};
use crate::utils::signal::shutdown_signal;
use crate::{error::AppResult, web::AppState};
use axum::Router;
use tokio::net::TcpListener;

pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod academy;
pub mod auth;
pub mod catalog;
pub mod error;
pub mod model;
pub mod utils;
pub mod web;

static APPLICATION_NAME: &str = "emc-academy";

/// Opens the storage backend selected in the config. PostgreSQL is migrated
/// before use.
pub async fn build_model(config: &Config) -> AppResult<ModelManager> {
    match config.app().storage() {
        StorageKind::Postgres => {
            let db = DbConnection::connect(config.app().database_uri())?;
            db.migrate(Path::new("./migrations")).await?;
            Ok(ModelManager::postgres(db).await?)
        }
        StorageKind::Memory => {
            tracing::warn!("using in-memory storage, progress will be lost on restart");
            Ok(ModelManager::memory().await?)
        }
    }
}

pub async fn build_server() -> AppResult<(AppState, Router)> {
    let config = Config::get_or_init(cfg!(debug_assertions)).await;
    let mm = build_model(config).await?;
    build_server_with_model(mm).await
}

pub async fn build_server_with_model(mm: ModelManager) -> AppResult<(AppState, Router)> {
    let config = Config::get_or_init(true).await;

    let catalog = Arc::new(Catalog::builtin()?);
    tracing::debug!(
        "catalog loaded: {} courses, {} lessons",
        catalog.courses().len(),
        catalog.lesson_count()
    );

    let academy = Academy::new(mm, catalog, AcademySettings::from_config(config));
    let state = AppState::new(academy);
    let app = web::routes::build_app(state.clone(), config);
    Ok((state, app))
}

#[tracing::instrument]
pub async fn setup_workers() -> AppResult<()> {
    let (_, app) = build_server().await?;
    let config = Config::get_or_init(cfg!(debug_assertions)).await;
    let listener = TcpListener::bind(config.host().bindto()).await?;

    tracing::info!("axum is starting at: {}", config.host().bindto());
    let axum_handle = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal());

    axum_handle.await?;
    Ok(())
}

pub fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}

#[tracing::instrument]
pub async fn run() -> AppResult<()> {
    setup_trace();
    setup_workers().await?;
    Ok(())
}
