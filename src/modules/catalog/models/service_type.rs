use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog entry; its default price is a ceiling for new sales, not a binding price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceType {
    pub id: String,
    pub name: String,
    pub default_price: Decimal,
    pub duration_minutes: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ServiceType {
    pub fn new(name: impl Into<String>, default_price: Decimal, duration_minutes: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            default_price,
            duration_minutes,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// Duration assumed when a new service type does not state one
pub const DEFAULT_DURATION_MINUTES: i32 = 30;

/// Body of `POST /services/types`
#[derive(Debug, Clone, Deserialize)]
pub struct NewServiceTypeRequest {
    pub name: String,
    pub default_price: Decimal,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
}

/// Admin edit; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceTypePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub default_price: Option<Decimal>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub include_inactive: bool,
}
