use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::serde_helpers::double_option;
use crate::modules::commissions::models::CommissionBearing;

/// What was billed: a catalog service or a free-form custom service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BilledItem {
    Catalog { service_type_id: String },
    Custom,
}

impl BilledItem {
    pub fn service_type_id(&self) -> Option<&str> {
        match self {
            BilledItem::Catalog { service_type_id } => Some(service_type_id),
            BilledItem::Custom => None,
        }
    }

    pub fn from_reference(service_type_id: Option<String>) -> Self {
        match service_type_id {
            Some(service_type_id) => BilledItem::Catalog { service_type_id },
            None => BilledItem::Custom,
        }
    }
}

/// A completed service sale
///
/// `commission_rate` is copied from the employee when the sale is priced and
/// never follows later changes to the employee's rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub employee_id: String,
    pub billed_item: BilledItem,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub price: Decimal,
    pub commission_rate: Decimal,
    pub commission_amount: Decimal,
    pub service_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommissionBearing for Sale {
    fn price(&self) -> Decimal {
        self.price
    }

    fn commission_amount(&self) -> Decimal {
        self.commission_amount
    }
}

/// Body of `POST /services`
#[derive(Debug, Clone, Deserialize)]
pub struct NewSaleRequest {
    pub employee_id: String,
    #[serde(default)]
    pub service_type_id: Option<String>,
    pub price: Decimal,
    pub client_name: String,
    #[serde(default)]
    pub client_phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Admin correction; absent fields are left alone, `null` clears optional ones
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalePatch {
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub service_type_id: Option<Option<String>>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub client_phone: Option<Option<String>>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl SalePatch {
    pub fn is_empty(&self) -> bool {
        self.employee_id.is_none()
            && self.service_type_id.is_none()
            && self.client_name.is_none()
            && self.client_phone.is_none()
            && self.price.is_none()
            && self.notes.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaleOrder {
    /// Oldest first, used by reports
    Chronological,
    /// Newest first, used by listings and dashboards
    #[default]
    MostRecentFirst,
}

/// Store-level sale filters; all bounds inclusive
#[derive(Debug, Clone, Default)]
pub struct SaleFilters {
    pub employee_id: Option<String>,
    /// Case-insensitive substring
    pub client_name: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub order: SaleOrder,
    pub limit: Option<usize>,
}

impl SaleFilters {
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            order: SaleOrder::Chronological,
            ..Self::default()
        }
    }

    pub fn for_employee(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    pub fn most_recent_first(mut self, limit: Option<usize>) -> Self {
        self.order = SaleOrder::MostRecentFirst;
        self.limit = limit;
        self
    }

    /// In-memory equivalent of the SQL predicate
    pub fn matches(&self, sale: &Sale) -> bool {
        if let Some(employee_id) = &self.employee_id {
            if &sale.employee_id != employee_id {
                return false;
            }
        }
        if let Some(needle) = &self.client_name {
            if !sale
                .client_name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(start) = self.start {
            if sale.service_date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if sale.service_date > end {
                return false;
            }
        }
        true
    }
}

/// Query string of `GET /services` and `GET /employees/me/services`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleQuery {
    pub employee_id: Option<String>,
    pub client_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<usize>,
}
