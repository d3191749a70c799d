use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::core::{AppError, Clock, Period, ReportingCalendar, Result, TimeWindow};
use crate::modules::catalog::repositories::ServiceTypeRepository;
use crate::modules::employees::repositories::EmployeeRepository;
use crate::modules::reports::models::{
    DashboardSummary, EmployeeComparison, EmployeeReport, PeriodReport, RecentSale, SaleLine,
    CUSTOM_SERVICE_LABEL,
};
use crate::modules::reports::services::PeriodAggregator;
use crate::modules::sales::models::{Sale, SaleFilters};
use crate::modules::sales::repositories::SaleRepository;

pub const CUSTOM_REPORT_LABEL: &str = "custom";

/// Read-side service for period reports and the dashboard
pub struct ReportService {
    sales: Arc<dyn SaleRepository>,
    employees: Arc<dyn EmployeeRepository>,
    service_types: Arc<dyn ServiceTypeRepository>,
    aggregator: PeriodAggregator,
    calendar: ReportingCalendar,
    clock: Arc<dyn Clock>,
    top_employees: usize,
    recent_sales: usize,
}

impl ReportService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sales: Arc<dyn SaleRepository>,
        employees: Arc<dyn EmployeeRepository>,
        service_types: Arc<dyn ServiceTypeRepository>,
        calendar: ReportingCalendar,
        clock: Arc<dyn Clock>,
        top_employees: usize,
        recent_sales: usize,
    ) -> Self {
        Self {
            sales,
            employees,
            service_types,
            aggregator: PeriodAggregator::new(calendar),
            calendar,
            clock,
            top_employees,
            recent_sales,
        }
    }

    fn today(&self) -> NaiveDate {
        self.calendar.local_date(self.clock.now())
    }

    /// Aggregate every sale in `[window.start, window.end]`
    pub async fn generate_report(&self, label: &str, window: TimeWindow) -> Result<PeriodReport> {
        let sales = self
            .sales
            .list(&SaleFilters::between(window.start, window.end))
            .await?;
        let names = self.employee_names(&sales).await?;

        let report = self.aggregator.aggregate(label, window, &sales, &names);

        tracing::debug!(
            label = %label,
            start = %window.start,
            end = %window.end,
            total_services = report.summary.total_services,
            "Period report generated"
        );

        Ok(report)
    }

    /// Named whole-day period ending on `end_date` (today when absent)
    pub async fn period_report(&self, period: Period, end_date: Option<NaiveDate>) -> Result<PeriodReport> {
        let end_date = end_date.unwrap_or_else(|| self.today());
        let window = self.calendar.report_window(period, end_date);
        self.generate_report(period.label(), window).await
    }

    pub async fn daily_report(&self, date: Option<NaiveDate>) -> Result<PeriodReport> {
        self.period_report(Period::Daily, date).await
    }

    pub async fn custom_report(&self, start_date: NaiveDate, end_date: NaiveDate) -> Result<PeriodReport> {
        let window = self.date_window(start_date, end_date)?;
        self.generate_report(CUSTOM_REPORT_LABEL, window).await
    }

    /// Totals per active employee; defaults to the month ending today
    pub async fn employee_comparison(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<EmployeeComparison>> {
        let window = match (start_date, end_date) {
            (Some(start), Some(end)) => self.date_window(start, end)?,
            (None, None) => self.calendar.report_window(Period::Monthly, self.today()),
            _ => {
                return Err(AppError::invalid_input(
                    "start_date and end_date must be given together",
                ))
            }
        };

        let filters = SaleFilters::between(window.start, window.end);
        let (employees, sales) =
            tokio::try_join!(self.employees.list_active(), self.sales.list(&filters))?;

        Ok(self.aggregator.compare(&employees, &sales))
    }

    /// One employee's sales over a trailing period, newest first
    pub async fn employee_report(&self, employee_id: &str, period: Period) -> Result<EmployeeReport> {
        let employee = self
            .employees
            .find_by_id(employee_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Employee {} not found", employee_id)))?;

        let window = self.calendar.trailing_window(period, self.clock.now());
        let sales = self
            .sales
            .list(
                &SaleFilters::between(window.start, window.end)
                    .for_employee(employee_id)
                    .most_recent_first(None),
            )
            .await?;
        let service_names = self.service_names(&sales).await?;

        let summary = self.aggregator.summary(&sales);
        let services = sales
            .iter()
            .map(|sale| SaleLine {
                id: sale.id.clone(),
                date: sale.service_date,
                client_name: sale.client_name.clone(),
                service_name: service_label(sale, &service_names),
                price: sale.price,
                commission_amount: sale.commission_amount,
            })
            .collect();

        Ok(EmployeeReport {
            employee_id: employee.id.clone(),
            employee_name: employee.display_name(),
            period: period.label().to_string(),
            window,
            summary,
            services,
        })
    }

    /// Today, this week and this month plus rankings and a recent-sales feed
    ///
    /// Fails as a whole if any underlying query fails.
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let today = self.today();
        let today_window = self.calendar.day_window(today);
        let week_window = self.calendar.report_window(Period::Weekly, today);
        let month_window = self.calendar.report_window(Period::Monthly, today);

        let today_filters = SaleFilters::between(today_window.start, today_window.end);
        let week_filters = SaleFilters::between(week_window.start, week_window.end);
        let month_filters = SaleFilters::between(month_window.start, month_window.end);
        let recent_filters = SaleFilters::default().most_recent_first(Some(self.recent_sales));

        let (today_sales, week_sales, month_sales, recent) = tokio::try_join!(
            self.sales.list(&today_filters),
            self.sales.list(&week_filters),
            self.sales.list(&month_filters),
            self.sales.list(&recent_filters),
        )?;

        let mut names_needed = month_sales.clone();
        names_needed.extend(recent.iter().cloned());
        let (employee_names, service_names) = tokio::try_join!(
            self.employee_names(&names_needed),
            self.service_names(&recent),
        )?;

        let mut top_employees = self
            .aggregator
            .group_by_employee(&month_sales, &employee_names);
        top_employees.truncate(self.top_employees);

        let recent_sales = recent
            .iter()
            .map(|sale| RecentSale {
                id: sale.id.clone(),
                client_name: sale.client_name.clone(),
                employee_name: employee_names
                    .get(&sale.employee_id)
                    .cloned()
                    .unwrap_or_else(|| sale.employee_id.clone()),
                service_name: service_label(sale, &service_names),
                price: sale.price,
                date: sale.service_date,
            })
            .collect();

        Ok(DashboardSummary {
            today: self.aggregator.totals(&today_sales),
            this_week: self.aggregator.totals(&week_sales),
            this_month: self.aggregator.totals(&month_sales),
            top_employees,
            recent_sales,
        })
    }

    fn date_window(&self, start_date: NaiveDate, end_date: NaiveDate) -> Result<TimeWindow> {
        if start_date > end_date {
            return Err(AppError::invalid_input(
                "start_date must be before or equal to end_date",
            ));
        }
        TimeWindow::new(
            self.calendar.start_of_day(start_date),
            self.calendar.end_of_day(end_date),
        )
    }

    async fn employee_names(&self, sales: &[Sale]) -> Result<HashMap<String, String>> {
        let ids: Vec<String> = sales
            .iter()
            .map(|sale| sale.employee_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let employees = self.employees.find_by_ids(&ids).await?;
        Ok(employees
            .into_iter()
            .map(|employee| {
                let name = employee.display_name();
                (employee.id, name)
            })
            .collect())
    }

    async fn service_names(&self, sales: &[Sale]) -> Result<HashMap<String, String>> {
        let ids: Vec<String> = sales
            .iter()
            .filter_map(|sale| sale.billed_item.service_type_id().map(str::to_string))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let service_types = self.service_types.find_by_ids(&ids).await?;
        Ok(service_types
            .into_iter()
            .map(|service_type| (service_type.id, service_type.name))
            .collect())
    }
}

/// Catalog name, or the custom-service label when none resolves
fn service_label(sale: &Sale, service_names: &HashMap<String, String>) -> String {
    sale.billed_item
        .service_type_id()
        .and_then(|id| service_names.get(id))
        .cloned()
        .unwrap_or_else(|| CUSTOM_SERVICE_LABEL.to_string())
}
