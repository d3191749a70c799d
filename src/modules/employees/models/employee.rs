use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Salon staff member who performs services and earns commission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Percentage in `[0, 100]`
    pub commission_rate: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, commission_rate: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            commission_rate,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Commission rate a new employee starts with when none is given
pub const DEFAULT_COMMISSION_RATE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Body of `POST /employees`
#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub commission_rate: Option<Decimal>,
}

/// Admin edit; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeePatch {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub commission_rate: Option<Decimal>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.commission_rate.is_none()
            && self.is_active.is_none()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EmployeeQuery {
    #[serde(default)]
    pub include_inactive: bool,
}
