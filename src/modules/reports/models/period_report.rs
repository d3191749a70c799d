use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{money, TimeWindow};
use crate::modules::commissions::models::SalesTotals;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total_services: usize,
    pub total_revenue: Decimal,
    pub total_commission: Decimal,
    pub total_business_earnings: Decimal,
    pub average_service_value: Decimal,
}

impl From<SalesTotals> for ReportSummary {
    fn from(totals: SalesTotals) -> Self {
        Self {
            total_services: totals.total_services,
            total_revenue: totals.total_revenue,
            total_commission: totals.total_commission,
            total_business_earnings: totals.total_business_earnings,
            average_service_value: totals.average_service_value(),
        }
    }
}

/// Per-employee group of a period report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeSummary {
    pub employee_id: String,
    pub employee_name: String,
    pub services_count: usize,
    pub total_revenue: Decimal,
    pub total_commission: Decimal,
    pub business_earnings: Decimal,
}

impl EmployeeSummary {
    pub fn empty(employee_id: impl Into<String>, employee_name: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            employee_name: employee_name.into(),
            services_count: 0,
            total_revenue: money::zero(),
            total_commission: money::zero(),
            business_earnings: money::zero(),
        }
    }
}

/// Per-day group, keyed by the reporting-clock date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub services_count: usize,
    pub total_revenue: Decimal,
    pub total_commission: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodReport {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: ReportSummary,
    pub by_employee: Vec<EmployeeSummary>,
    pub by_day: Vec<DailySummary>,
}

impl PeriodReport {
    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start,
            end: self.end,
        }
    }
}

/// Totals of one active employee, zero when they had no sales
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeComparison {
    pub employee_id: String,
    pub employee_name: String,
    pub commission_rate: Decimal,
    pub services_count: usize,
    pub total_revenue: Decimal,
    pub total_commission: Decimal,
    pub business_earnings: Decimal,
    pub average_service_value: Decimal,
}

/// One sale as shown in an employee's own report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleLine {
    pub id: String,
    pub date: DateTime<Utc>,
    pub client_name: String,
    pub service_name: String,
    pub price: Decimal,
    pub commission_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeReport {
    pub employee_id: String,
    pub employee_name: String,
    pub period: String,
    pub window: TimeWindow,
    pub summary: ReportSummary,
    /// Newest first
    pub services: Vec<SaleLine>,
}
