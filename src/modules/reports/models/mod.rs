pub mod dashboard;
pub mod period_report;

pub use dashboard::{DashboardSummary, PeriodTotals, RecentSale, CUSTOM_SERVICE_LABEL};
pub use period_report::{
    DailySummary, EmployeeComparison, EmployeeReport, EmployeeSummary, PeriodReport,
    ReportSummary, SaleLine,
};
