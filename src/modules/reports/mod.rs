// Period reports and dashboard

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{DashboardSummary, EmployeeReport, PeriodReport};
pub use services::{PeriodAggregator, ReportService};
