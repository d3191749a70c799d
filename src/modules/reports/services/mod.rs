pub mod period_aggregator;
pub mod report_service;

pub use period_aggregator::PeriodAggregator;
pub use report_service::ReportService;
