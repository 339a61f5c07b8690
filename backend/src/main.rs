//! Worksheets server entry-point: loads settings, picks a record store and
//! serves the REST API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use server::{AppSettings, ServerConfig, WorksheetStore, create_server};
use worksheets::inbound::http::health::HealthState;
use worksheets::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use worksheets::outbound::postgrest::PostgrestWorksheetRepository;

/// Pick the record store: database URL first, then PostgREST, then memory.
async fn select_store(settings: &AppSettings) -> io::Result<WorksheetStore> {
    if let Some(database_url) = settings.database_url.as_deref() {
        if settings.run_migrations {
            let applied = run_pending_migrations(database_url)
                .await
                .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
            info!(applied, "database schema up to date");
        }
        let mut pool_config = PoolConfig::new(database_url)
            .with_connection_timeout(settings.request_timeout());
        if let Some(max_size) = settings.pool_max_size {
            pool_config = pool_config.with_max_size(max_size);
        }
        let pool = DbPool::new(pool_config)
            .await
            .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
        return Ok(WorksheetStore::Diesel(pool));
    }

    if let Some(raw_url) = settings.postgrest_url.as_deref() {
        let base_url = Url::parse(raw_url)
            .map_err(|error| io::Error::other(format!("parse PostgREST URL: {error}")))?;
        let api_key = settings.postgrest_api_key.clone().unwrap_or_default();
        if api_key.is_empty() {
            warn!("PostgREST URL set without an API key");
        }
        let repository =
            PostgrestWorksheetRepository::new(&base_url, api_key, settings.request_timeout())
                .map_err(|error| io::Error::other(format!("create PostgREST client: {error}")))?;
        return Ok(WorksheetStore::Postgrest(repository));
    }

    warn!("no record store configured; worksheets are kept in memory");
    Ok(WorksheetStore::InMemory)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|error| io::Error::other(format!("parse bind address: {error}")))?;
    let store = select_store(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state,
        ServerConfig::new(bind_addr).with_store(store),
    )?;
    server.await
}
