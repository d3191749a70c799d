use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};

use crate::core::{AppError, Result};
use crate::modules::sales::models::{BilledItem, Sale, SaleFilters, SaleOrder};

/// Repository for sale records
#[async_trait]
pub trait SaleRepository: Send + Sync {
    async fn insert(&self, sale: &Sale) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Sale>>;

    async fn list(&self, filters: &SaleFilters) -> Result<Vec<Sale>>;

    /// Overwrites every mutable column of an existing sale; `NotFound` when
    /// no sale has that id
    async fn update(&self, sale: &Sale) -> Result<()>;

    /// Returns false when no sale had that id
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[derive(Debug, FromRow)]
struct SaleRow {
    id: String,
    employee_id: String,
    service_type_id: Option<String>,
    client_name: String,
    client_phone: Option<String>,
    price: Decimal,
    commission_rate: Decimal,
    commission_amount: Decimal,
    service_date: DateTime<Utc>,
    notes: Option<String>,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Sale {
            id: row.id,
            employee_id: row.employee_id,
            billed_item: BilledItem::from_reference(row.service_type_id),
            client_name: row.client_name,
            client_phone: row.client_phone,
            price: row.price,
            commission_rate: row.commission_rate,
            commission_amount: row.commission_amount,
            service_date: row.service_date,
            notes: row.notes,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SALE_COLUMNS: &str = "id, employee_id, service_type_id, client_name, client_phone, \
    price, commission_rate, commission_amount, service_date, notes, created_by, \
    created_at, updated_at";

/// Escapes LIKE wildcards so user input only matches literally
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

pub struct MySqlSaleRepository {
    pool: MySqlPool,
}

impl MySqlSaleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SaleRepository for MySqlSaleRepository {
    async fn insert(&self, sale: &Sale) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sales (
                id, employee_id, service_type_id, client_name, client_phone,
                price, commission_rate, commission_amount, service_date, notes,
                created_by, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.employee_id)
        .bind(sale.billed_item.service_type_id())
        .bind(&sale.client_name)
        .bind(&sale.client_phone)
        .bind(sale.price)
        .bind(sale.commission_rate)
        .bind(sale.commission_amount)
        .bind(sale.service_date)
        .bind(&sale.notes)
        .bind(&sale.created_by)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create sale: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {} FROM sales WHERE id = ?",
            SALE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch sale: {}", e)))?;

        Ok(row.map(Sale::from))
    }

    async fn list(&self, filters: &SaleFilters) -> Result<Vec<Sale>> {
        let mut builder: QueryBuilder<MySql> =
            QueryBuilder::new(format!("SELECT {} FROM sales WHERE 1 = 1", SALE_COLUMNS));

        if let Some(employee_id) = &filters.employee_id {
            builder.push(" AND employee_id = ").push_bind(employee_id.clone());
        }
        if let Some(client_name) = &filters.client_name {
            builder
                .push(" AND LOWER(client_name) LIKE ")
                .push_bind(like_pattern(client_name));
        }
        if let Some(start) = filters.start {
            builder.push(" AND service_date >= ").push_bind(start);
        }
        if let Some(end) = filters.end {
            builder.push(" AND service_date <= ").push_bind(end);
        }

        match filters.order {
            SaleOrder::Chronological => builder.push(" ORDER BY service_date ASC, created_at ASC"),
            SaleOrder::MostRecentFirst => {
                builder.push(" ORDER BY service_date DESC, created_at DESC")
            }
        };

        if let Some(limit) = filters.limit {
            builder.push(" LIMIT ").push_bind(limit as u64);
        }

        let rows = builder
            .build_query_as::<SaleRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to list sales: {}", e)))?;

        Ok(rows.into_iter().map(Sale::from).collect())
    }

    async fn update(&self, sale: &Sale) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE sales SET
                employee_id = ?,
                service_type_id = ?,
                client_name = ?,
                client_phone = ?,
                price = ?,
                commission_rate = ?,
                commission_amount = ?,
                notes = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&sale.employee_id)
        .bind(sale.billed_item.service_type_id())
        .bind(&sale.client_name)
        .bind(&sale.client_phone)
        .bind(sale.price)
        .bind(sale.commission_rate)
        .bind(sale.commission_amount)
        .bind(&sale.notes)
        .bind(sale.updated_at)
        .bind(&sale.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update sale: {}", e)))?;

        // sqlx connects with CLIENT_FOUND_ROWS, so an unchanged row still counts
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Sale {} not found", sale.id)));
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete sale: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
