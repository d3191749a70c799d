use std::collections::HashMap;

use crate::core::{money, ReportingCalendar, TimeWindow};
use crate::modules::commissions::models::{CommissionBearing, SalesTotals};
use crate::modules::commissions::services::CommissionCalculator;
use crate::modules::employees::models::Employee;
use crate::modules::reports::models::{
    DailySummary, EmployeeComparison, EmployeeSummary, PeriodReport, PeriodTotals, ReportSummary,
};
use crate::modules::sales::models::Sale;

/// Groups sales into period summaries
///
/// Pure: callers load the sales and employee names, the aggregator never
/// touches a store.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodAggregator {
    calculator: CommissionCalculator,
    calendar: ReportingCalendar,
}

impl PeriodAggregator {
    pub fn new(calendar: ReportingCalendar) -> Self {
        Self {
            calculator: CommissionCalculator::new(),
            calendar,
        }
    }

    /// Build a period report from sales ordered oldest first
    ///
    /// Sales outside the window are ignored.
    pub fn aggregate(
        &self,
        label: &str,
        window: TimeWindow,
        sales: &[Sale],
        employee_names: &HashMap<String, String>,
    ) -> PeriodReport {
        let in_window: Vec<Sale> = sales
            .iter()
            .filter(|sale| window.contains(sale.service_date))
            .cloned()
            .collect();

        PeriodReport {
            label: label.to_string(),
            start: window.start,
            end: window.end,
            summary: ReportSummary::from(self.calculator.calculate_totals(&in_window)),
            by_employee: self.group_by_employee(&in_window, employee_names),
            by_day: self.group_by_day(&in_window),
        }
    }

    /// Descending by revenue; ties keep first-seen order
    pub fn group_by_employee(
        &self,
        sales: &[Sale],
        employee_names: &HashMap<String, String>,
    ) -> Vec<EmployeeSummary> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<EmployeeSummary> = Vec::new();

        for sale in sales {
            let slot = *index.entry(sale.employee_id.as_str()).or_insert_with(|| {
                let name = employee_names
                    .get(&sale.employee_id)
                    .cloned()
                    .unwrap_or_else(|| sale.employee_id.clone());
                groups.push(EmployeeSummary::empty(sale.employee_id.clone(), name));
                groups.len() - 1
            });

            let group = &mut groups[slot];
            group.services_count += 1;
            group.total_revenue += sale.price;
            group.total_commission += sale.commission_amount;
            group.business_earnings += sale.business_earnings();
        }

        // sort_by is stable
        groups.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
        groups
    }

    /// One entry per reporting day, in first-seen order
    pub fn group_by_day(&self, sales: &[Sale]) -> Vec<DailySummary> {
        let mut index = HashMap::new();
        let mut days: Vec<DailySummary> = Vec::new();

        for sale in sales {
            let date = self.calendar.local_date(sale.service_date);
            let slot = *index.entry(date).or_insert_with(|| {
                days.push(DailySummary {
                    date,
                    services_count: 0,
                    total_revenue: money::zero(),
                    total_commission: money::zero(),
                });
                days.len() - 1
            });

            let day = &mut days[slot];
            day.services_count += 1;
            day.total_revenue += sale.price;
            day.total_commission += sale.commission_amount;
        }

        days
    }

    pub fn summary(&self, sales: &[Sale]) -> ReportSummary {
        ReportSummary::from(self.calculator.calculate_totals(sales))
    }

    pub fn totals(&self, sales: &[Sale]) -> PeriodTotals {
        PeriodTotals::from(self.calculator.calculate_totals(sales))
    }

    /// Totals for every given employee, including those without sales
    pub fn compare(&self, employees: &[Employee], sales: &[Sale]) -> Vec<EmployeeComparison> {
        let mut per_employee: HashMap<&str, SalesTotals> = HashMap::new();
        for sale in sales {
            per_employee
                .entry(sale.employee_id.as_str())
                .or_default()
                .add(sale);
        }

        employees
            .iter()
            .map(|employee| {
                let totals = per_employee
                    .get(employee.id.as_str())
                    .copied()
                    .unwrap_or_default();
                EmployeeComparison {
                    employee_id: employee.id.clone(),
                    employee_name: employee.display_name(),
                    commission_rate: employee.commission_rate,
                    services_count: totals.total_services,
                    total_revenue: totals.total_revenue,
                    total_commission: totals.total_commission,
                    business_earnings: totals.total_business_earnings,
                    average_service_value: totals.average_service_value(),
                }
            })
            .collect()
    }
}
