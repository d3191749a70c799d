use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::MySqlDatabaseError;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};

use crate::core::{AppError, Result, TimeWindow};
use crate::modules::withdrawals::models::{
    Balance, BankAccountSnapshot, Withdrawal, WithdrawalDraft, WithdrawalReceipt,
    WithdrawalStatus,
};

/// MySQL deadlock and lock-wait timeout
const ER_LOCK_DEADLOCK: u16 = 1213;
const ER_LOCK_WAIT_TIMEOUT: u16 = 1205;

/// Review decision applied by `update_status`
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub from: WithdrawalStatus,
    pub to: WithdrawalStatus,
    pub reviewed_at: DateTime<Utc>,
    pub reviewed_by: String,
    pub notes: Option<String>,
}

/// Repository for withdrawal records
#[async_trait]
pub trait WithdrawalRepository: Send + Sync {
    /// Sum of PENDING and APPROVED amounts created inside the window
    async fn total_withdrawn(&self, employee_id: &str, window: &TimeWindow) -> Result<Decimal>;

    /// Check the balance and insert the draft as one atomic unit per employee
    ///
    /// # Returns
    /// * The stored PENDING withdrawal and the balance left after it
    ///
    /// # Errors
    /// * `NotFound` - unknown employee
    /// * `InsufficientBalance` - amount exceeds the available balance
    /// * `Conflict` - the store could not serialize the request
    async fn admit(&self, draft: WithdrawalDraft, window: &TimeWindow) -> Result<WithdrawalReceipt>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Withdrawal>>;

    /// Newest first
    async fn list_by_employee(&self, employee_id: &str, limit: Option<usize>) -> Result<Vec<Withdrawal>>;

    /// Moves `from` → `to` only if the status is still `from`
    async fn update_status(&self, id: &str, change: StatusChange) -> Result<Withdrawal>;
}

#[derive(Debug, FromRow)]
struct WithdrawalRow {
    id: String,
    employee_id: String,
    amount: Decimal,
    status: String,
    account_holder: String,
    account_number_masked: String,
    bank_name: String,
    account_type: String,
    operation_number: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    reviewed_at: Option<DateTime<Utc>>,
    reviewed_by: Option<String>,
}

impl TryFrom<WithdrawalRow> for Withdrawal {
    type Error = AppError;

    fn try_from(row: WithdrawalRow) -> Result<Self> {
        Ok(Withdrawal {
            id: row.id,
            employee_id: row.employee_id,
            amount: row.amount,
            status: row.status.parse()?,
            bank_account: BankAccountSnapshot {
                account_holder: row.account_holder,
                account_number_masked: row.account_number_masked,
                bank_name: row.bank_name,
                account_type: row.account_type.parse()?,
            },
            operation_number: row.operation_number,
            notes: row.notes,
            created_at: row.created_at,
            reviewed_at: row.reviewed_at,
            reviewed_by: row.reviewed_by,
        })
    }
}

const WITHDRAWAL_COLUMNS: &str = "id, employee_id, amount, status, account_holder, \
    account_number_masked, bank_name, account_type, operation_number, notes, created_at, \
    reviewed_at, reviewed_by";

/// Lock contention becomes `Conflict`; everything else is internal
fn map_write_error(e: sqlx::Error, context: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if let Some(mysql_err) = db_err.try_downcast_ref::<MySqlDatabaseError>() {
            if matches!(mysql_err.number(), ER_LOCK_DEADLOCK | ER_LOCK_WAIT_TIMEOUT) {
                return AppError::conflict(format!(
                    "Concurrent withdrawal in progress, retry the request ({})",
                    mysql_err.number()
                ));
            }
        }
        if db_err.is_unique_violation() {
            return AppError::conflict("Operation number already issued, retry the request");
        }
    }
    AppError::Internal(format!("{}: {}", context, e))
}

pub struct MySqlWithdrawalRepository {
    pool: MySqlPool,
}

impl MySqlWithdrawalRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WithdrawalRepository for MySqlWithdrawalRepository {
    async fn total_withdrawn(&self, employee_id: &str, window: &TimeWindow) -> Result<Decimal> {
        sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount), 0.00)
            FROM withdrawals
            WHERE employee_id = ?
              AND status IN ('PENDING', 'APPROVED')
              AND created_at BETWEEN ? AND ?
            "#,
        )
        .bind(employee_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to sum withdrawals: {}", e)))
    }

    async fn admit(&self, draft: WithdrawalDraft, window: &TimeWindow) -> Result<WithdrawalReceipt> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to start transaction: {}", e)))?;

        // Serializes concurrent requests for the same employee; must run before
        // the first read so the sums below see every committed withdrawal.
        let locked = sqlx::query_scalar::<_, String>("SELECT id FROM employees WHERE id = ? FOR UPDATE")
            .bind(&draft.employee_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, "Failed to lock employee"))?;

        if locked.is_none() {
            return Err(AppError::not_found(format!(
                "Employee {} not found",
                draft.employee_id
            )));
        }

        let total_commission = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(commission_amount), 0.00)
            FROM sales
            WHERE employee_id = ?
              AND service_date BETWEEN ? AND ?
            "#,
        )
        .bind(&draft.employee_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to sum commission"))?;

        let total_withdrawn = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount), 0.00)
            FROM withdrawals
            WHERE employee_id = ?
              AND status IN ('PENDING', 'APPROVED')
              AND created_at BETWEEN ? AND ?
            "#,
        )
        .bind(&draft.employee_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to sum withdrawals"))?;

        let remaining = Balance::new(total_commission, total_withdrawn).admit(draft.amount)?;
        let withdrawal = draft.into_pending();

        sqlx::query(
            r#"
            INSERT INTO withdrawals (
                id, employee_id, amount, status, account_holder, account_number_masked,
                bank_name, account_type, operation_number, notes, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&withdrawal.id)
        .bind(&withdrawal.employee_id)
        .bind(withdrawal.amount)
        .bind(withdrawal.status.as_str())
        .bind(&withdrawal.bank_account.account_holder)
        .bind(&withdrawal.bank_account.account_number_masked)
        .bind(&withdrawal.bank_account.bank_name)
        .bind(withdrawal.bank_account.account_type.as_str())
        .bind(&withdrawal.operation_number)
        .bind(&withdrawal.notes)
        .bind(withdrawal.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to create withdrawal"))?;

        tx.commit()
            .await
            .map_err(|e| map_write_error(e, "Failed to commit withdrawal"))?;

        Ok(WithdrawalReceipt {
            withdrawal,
            available_balance: remaining,
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Withdrawal>> {
        let row = sqlx::query_as::<_, WithdrawalRow>(&format!(
            "SELECT {} FROM withdrawals WHERE id = ?",
            WITHDRAWAL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch withdrawal: {}", e)))?;

        row.map(Withdrawal::try_from).transpose()
    }

    async fn list_by_employee(&self, employee_id: &str, limit: Option<usize>) -> Result<Vec<Withdrawal>> {
        let mut builder: QueryBuilder<MySql> = QueryBuilder::new(format!(
            "SELECT {} FROM withdrawals WHERE employee_id = ",
            WITHDRAWAL_COLUMNS
        ));
        builder.push_bind(employee_id);
        builder.push(" ORDER BY created_at DESC");
        if let Some(limit) = limit {
            builder.push(" LIMIT ").push_bind(limit as u64);
        }

        let rows = builder
            .build_query_as::<WithdrawalRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to list withdrawals: {}", e)))?;

        rows.into_iter().map(Withdrawal::try_from).collect()
    }

    async fn update_status(&self, id: &str, change: StatusChange) -> Result<Withdrawal> {
        let result = sqlx::query(
            r#"
            UPDATE withdrawals
            SET status = ?, reviewed_at = ?, reviewed_by = ?, notes = COALESCE(?, notes)
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(change.to.as_str())
        .bind(change.reviewed_at)
        .bind(&change.reviewed_by)
        .bind(&change.notes)
        .bind(id)
        .bind(change.from.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update withdrawal"))?;

        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Withdrawal {} not found", id)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "Withdrawal {} is already {}",
                id, current.status
            )));
        }

        Ok(current)
    }
}
