use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use salonledger::app::{event_publisher, AppState, Repositories, ServiceSettings};
use salonledger::config::{Config, DatabaseConfig, LogFormat, StorageBackend};
use salonledger::core::{Clock, SystemClock};
use salonledger::middleware::identity::{EMPLOYEE_ID_HEADER, ROLE_HEADER, USER_ID_HEADER};
use salonledger::middleware::{RequestId, REQUEST_ID_HEADER};
use salonledger::modules::health::HealthState;
use salonledger::store::InMemoryStore;

fn init_tracing(level: &str, format: LogFormat) {
    // RUST_LOG wins over LOG_LEVEL
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("salonledger={},actix_web=info", level).into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

fn cors(origin: Option<&str>) -> Cors {
    let cors = match origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            header::CONTENT_TYPE.as_str(),
            USER_ID_HEADER,
            ROLE_HEADER,
            EMPLOYEE_ID_HEADER,
            REQUEST_ID_HEADER,
        ])
        .expose_headers(vec![REQUEST_ID_HEADER])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    init_tracing(&config.app.log_level, config.app.log_format);

    tracing::info!("Starting salon ledger");
    tracing::info!(
        env = %config.app.env,
        storage = config.app.storage.as_str(),
        reporting_offset = %config.app.reporting_offset,
        "Configuration loaded"
    );

    let (repos, health) = match (config.app.storage, &config.database) {
        (StorageBackend::Mysql, Some(database)) => {
            let pool = database
                .create_pool()
                .await
                .context("Failed to create database pool")?;
            DatabaseConfig::run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;

            tracing::info!(
                pool_size = database.pool_size,
                max_connections = database.max_connections,
                "Database pool initialized"
            );

            (Repositories::mysql(pool.clone()), HealthState::mysql(pool))
        }
        (StorageBackend::Mysql, None) => {
            anyhow::bail!("STORAGE_BACKEND=mysql requires DATABASE_URL")
        }
        (StorageBackend::Memory, _) => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            (
                Repositories::in_memory(Arc::new(InMemoryStore::new())),
                HealthState::memory(),
            )
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let events = Arc::new(
        event_publisher(&config.notifications, clock.clone())
            .context("Failed to build event publisher")?,
    );

    let state = AppState::new(
        repos,
        ServiceSettings::from_config(&config.app, &config.notifications),
        clock,
        events,
        health,
    );

    let bind_address = config.server.bind_address();
    let cors_origin = config.server.cors_origin.clone();

    let server = HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(cors(cors_origin.as_deref()))
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .configure(move |cfg| state.configure(cfg))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!(address = %bind_address, workers = config.server.workers, "Server started");

    server.await.context("Server error")?;
    Ok(())
}
