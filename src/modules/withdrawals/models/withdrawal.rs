use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, ReportingCalendar};
use crate::modules::withdrawals::models::{BankAccount, BankAccountSnapshot};

/// Withdrawal lifecycle; only PENDING may move, and only once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Rejected,
}

impl WithdrawalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalStatus::Pending => "PENDING",
            WithdrawalStatus::Approved => "APPROVED",
            WithdrawalStatus::Rejected => "REJECTED",
        }
    }

    /// Pending and approved requests reduce the available balance
    pub fn counts_against_balance(&self) -> bool {
        matches!(self, WithdrawalStatus::Pending | WithdrawalStatus::Approved)
    }

    pub fn can_transition_to(&self, next: WithdrawalStatus) -> bool {
        matches!(
            (self, next),
            (WithdrawalStatus::Pending, WithdrawalStatus::Approved)
                | (WithdrawalStatus::Pending, WithdrawalStatus::Rejected)
        )
    }
}

impl std::fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WithdrawalStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(WithdrawalStatus::Pending),
            "APPROVED" => Ok(WithdrawalStatus::Approved),
            "REJECTED" => Ok(WithdrawalStatus::Rejected),
            other => Err(AppError::internal(format!("Unknown withdrawal status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub id: String,
    pub employee_id: String,
    pub amount: Decimal,
    pub status: WithdrawalStatus,
    pub bank_account: BankAccountSnapshot,
    pub operation_number: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<String>,
}

/// A withdrawal that has not yet passed the balance check
#[derive(Debug, Clone)]
pub struct WithdrawalDraft {
    pub id: String,
    pub employee_id: String,
    pub amount: Decimal,
    pub bank_account: BankAccountSnapshot,
    pub operation_number: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WithdrawalDraft {
    pub fn into_pending(self) -> Withdrawal {
        Withdrawal {
            id: self.id,
            employee_id: self.employee_id,
            amount: self.amount,
            status: WithdrawalStatus::Pending,
            bank_account: self.bank_account,
            operation_number: self.operation_number,
            notes: self.notes,
            created_at: self.created_at,
            reviewed_at: None,
            reviewed_by: None,
        }
    }
}

/// Human-readable withdrawal reference, `WD-YYYYMMDD-HHMMSS-XXXXXXXX`
pub struct OperationNumber;

impl OperationNumber {
    pub fn generate(now: DateTime<Utc>, calendar: &ReportingCalendar) -> String {
        let local = now.with_timezone(&calendar.offset());
        let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        format!("WD-{}-{}", local.format("%Y%m%d-%H%M%S"), suffix)
    }
}

/// Body of `POST /employees/me/withdraw`
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawalRequest {
    pub amount: Decimal,
    pub bank_account: BankAccount,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of `POST /withdrawals/{id}/review`
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewWithdrawalRequest {
    pub status: WithdrawalStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Accepted withdrawal plus the balance left after it
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalReceipt {
    pub withdrawal: Withdrawal,
    pub available_balance: Decimal,
}
