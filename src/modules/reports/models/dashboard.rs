use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::modules::commissions::models::SalesTotals;
use crate::modules::reports::models::EmployeeSummary;

/// Display name for sales without a resolvable catalog service
pub const CUSTOM_SERVICE_LABEL: &str = "Servicio personalizado";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub services: usize,
    pub revenue: Decimal,
    pub commission: Decimal,
}

impl From<SalesTotals> for PeriodTotals {
    fn from(totals: SalesTotals) -> Self {
        Self {
            services: totals.total_services,
            revenue: totals.total_revenue,
            commission: totals.total_commission,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentSale {
    pub id: String,
    pub client_name: String,
    pub employee_name: String,
    pub service_name: String,
    pub price: Decimal,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub today: PeriodTotals,
    pub this_week: PeriodTotals,
    pub this_month: PeriodTotals,
    pub top_employees: Vec<EmployeeSummary>,
    pub recent_sales: Vec<RecentSale>,
}
