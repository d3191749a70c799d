use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};

use crate::core::{AppError, Result};
use crate::modules::catalog::models::ServiceType;

#[async_trait]
pub trait ServiceTypeRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<ServiceType>>;

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<ServiceType>>;

    /// Catalog ordered by name; active entries only unless asked otherwise
    async fn list_catalog(&self, include_inactive: bool) -> Result<Vec<ServiceType>>;

    async fn save(&self, service_type: &ServiceType) -> Result<()>;
}

#[derive(Debug, FromRow)]
struct ServiceTypeRow {
    id: String,
    name: String,
    default_price: Decimal,
    duration_minutes: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<ServiceTypeRow> for ServiceType {
    fn from(row: ServiceTypeRow) -> Self {
        ServiceType {
            id: row.id,
            name: row.name,
            default_price: row.default_price,
            duration_minutes: row.duration_minutes,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

const SERVICE_TYPE_COLUMNS: &str =
    "id, name, default_price, duration_minutes, is_active, created_at";

pub struct MySqlServiceTypeRepository {
    pool: MySqlPool,
}

impl MySqlServiceTypeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceTypeRepository for MySqlServiceTypeRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<ServiceType>> {
        let row = sqlx::query_as::<_, ServiceTypeRow>(&format!(
            "SELECT {} FROM service_types WHERE id = ?",
            SERVICE_TYPE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch service type: {}", e)))?;

        Ok(row.map(ServiceType::from))
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<ServiceType>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<MySql> = QueryBuilder::new(format!(
            "SELECT {} FROM service_types WHERE id IN (",
            SERVICE_TYPE_COLUMNS
        ));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let rows = builder
            .build_query_as::<ServiceTypeRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to fetch service types: {}", e)))?;

        Ok(rows.into_iter().map(ServiceType::from).collect())
    }

    async fn list_catalog(&self, include_inactive: bool) -> Result<Vec<ServiceType>> {
        let mut builder: QueryBuilder<MySql> =
            QueryBuilder::new(format!("SELECT {} FROM service_types", SERVICE_TYPE_COLUMNS));
        if !include_inactive {
            builder.push(" WHERE is_active = TRUE");
        }
        builder.push(" ORDER BY name");

        let rows = builder
            .build_query_as::<ServiceTypeRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to list service types: {}", e)))?;

        Ok(rows.into_iter().map(ServiceType::from).collect())
    }

    async fn save(&self, service_type: &ServiceType) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO service_types (
                id, name, default_price, duration_minutes, is_active, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                name = VALUES(name),
                default_price = VALUES(default_price),
                duration_minutes = VALUES(duration_minutes),
                is_active = VALUES(is_active)
            "#,
        )
        .bind(&service_type.id)
        .bind(&service_type.name)
        .bind(service_type.default_price)
        .bind(service_type.duration_minutes)
        .bind(service_type.is_active)
        .bind(service_type.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to save service type: {}", e)))?;

        Ok(())
    }
}
