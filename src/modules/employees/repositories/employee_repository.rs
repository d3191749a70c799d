use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};

use crate::core::{AppError, Result};
use crate::modules::employees::models::Employee;

/// Repository for employee records
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>>;

    /// Unknown ids are silently skipped
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Employee>>;

    /// Active employees ordered by first name
    async fn list_active(&self) -> Result<Vec<Employee>>;

    /// Every employee, inactive ones included, ordered by first name
    async fn list_all(&self) -> Result<Vec<Employee>>;

    /// Insert or update
    async fn save(&self, employee: &Employee) -> Result<()>;
}

#[derive(Debug, FromRow)]
struct EmployeeRow {
    id: String,
    first_name: String,
    last_name: String,
    commission_rate: Decimal,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            commission_rate: row.commission_rate,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const EMPLOYEE_COLUMNS: &str =
    "id, first_name, last_name, commission_rate, is_active, created_at, updated_at";

pub struct MySqlEmployeeRepository {
    pool: MySqlPool,
}

impl MySqlEmployeeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for MySqlEmployeeRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {} FROM employees WHERE id = ?",
            EMPLOYEE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch employee: {}", e)))?;

        Ok(row.map(Employee::from))
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Employee>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<MySql> =
            QueryBuilder::new(format!("SELECT {} FROM employees WHERE id IN (", EMPLOYEE_COLUMNS));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let rows = builder
            .build_query_as::<EmployeeRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to fetch employees: {}", e)))?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn list_active(&self) -> Result<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {} FROM employees WHERE is_active = TRUE ORDER BY first_name, last_name",
            EMPLOYEE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list employees: {}", e)))?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn list_all(&self) -> Result<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {} FROM employees ORDER BY first_name, last_name",
            EMPLOYEE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list employees: {}", e)))?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn save(&self, employee: &Employee) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO employees (
                id, first_name, last_name, commission_rate, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                first_name = VALUES(first_name),
                last_name = VALUES(last_name),
                commission_rate = VALUES(commission_rate),
                is_active = VALUES(is_active),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(&employee.id)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(employee.commission_rate)
        .bind(employee.is_active)
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to save employee: {}", e)))?;

        Ok(())
    }
}
