use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::withdrawals::models::WithdrawalStatus;

/// Facts published after a successful write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    SaleCreated {
        sale_id: String,
        employee_id: String,
        price: Decimal,
        commission_amount: Decimal,
        /// Requested price exceeded the catalog ceiling
        clamped: bool,
        created_by: String,
    },
    SaleCorrected {
        sale_id: String,
        employee_id: String,
        price: Decimal,
        commission_amount: Decimal,
        commission_recomputed: bool,
    },
    SaleDeleted {
        sale_id: String,
        employee_id: String,
    },
    WithdrawalRequested {
        withdrawal_id: String,
        operation_number: String,
        employee_id: String,
        amount: Decimal,
        available_balance: Decimal,
        #[serde(skip_serializing_if = "Option::is_none")]
        notify: Option<String>,
    },
    WithdrawalReviewed {
        withdrawal_id: String,
        operation_number: String,
        employee_id: String,
        status: WithdrawalStatus,
        reviewed_by: String,
    },
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::SaleCreated { .. } => "sale_created",
            DomainEvent::SaleCorrected { .. } => "sale_corrected",
            DomainEvent::SaleDeleted { .. } => "sale_deleted",
            DomainEvent::WithdrawalRequested { .. } => "withdrawal_requested",
            DomainEvent::WithdrawalReviewed { .. } => "withdrawal_reviewed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: String,
    pub occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: DomainEvent,
}

impl EventEnvelope {
    pub fn new(event: DomainEvent, occurred_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            occurred_at,
            event,
        }
    }
}
