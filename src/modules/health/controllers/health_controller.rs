use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::config::StorageBackend;

/// What the probes need to know about the running instance
#[derive(Clone)]
pub struct HealthState {
    pub backend: StorageBackend,
    pub pool: Option<MySqlPool>,
}

impl HealthState {
    pub fn memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            pool: None,
        }
    }

    pub fn mysql(pool: MySqlPool) -> Self {
        Self {
            backend: StorageBackend::Mysql,
            pool: Some(pool),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub storage: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub storage: bool,
}

/// GET /health - liveness, no dependency checks
pub async fn health_check(state: web::Data<HealthState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        storage: state.backend.as_str().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /ready - pings the database when one is configured
pub async fn readiness_check(state: web::Data<HealthState>) -> impl Responder {
    let storage = match &state.pool {
        Some(pool) => match sqlx::query("SELECT 1").fetch_one(pool).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "Database readiness check failed");
                false
            }
        },
        None => true,
    };

    let response = ReadinessResponse {
        ready: storage,
        storage,
    };

    if response.ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check));
}
