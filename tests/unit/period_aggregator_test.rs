// Property tests for period aggregation
//
// Whatever the mix of sales, the per-employee and per-day groups must
// partition the summary exactly.

use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use salonledger::core::{ReportingCalendar, TimeWindow};
use salonledger::modules::commissions::services::CommissionCalculator;
use salonledger::modules::employees::models::Employee;
use salonledger::modules::reports::services::PeriodAggregator;
use salonledger::modules::sales::models::{BilledItem, Sale};

const EMPLOYEES: [&str; 4] = ["emp-a", "emp-b", "emp-c", "emp-d"];

fn window_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap()
}

fn window() -> TimeWindow {
    TimeWindow::new(window_start(), window_start() + Duration::days(14) - Duration::milliseconds(1)).unwrap()
}

fn sale(employee: usize, price_cents: u64, minutes: i64) -> Sale {
    let price = Decimal::new(price_cents as i64, 2);
    let split = CommissionCalculator::new()
        .calculate_commission(price, dec!(45))
        .unwrap();
    let at = window_start() + Duration::minutes(minutes);

    Sale {
        id: uuid::Uuid::new_v4().to_string(),
        employee_id: EMPLOYEES[employee].to_string(),
        billed_item: BilledItem::Custom,
        client_name: "Cliente".to_string(),
        client_phone: None,
        price,
        commission_rate: dec!(45),
        commission_amount: split.commission_amount,
        service_date: at,
        notes: None,
        created_by: "admin".to_string(),
        created_at: at,
        updated_at: at,
    }
}

fn sales_strategy() -> impl Strategy<Value = Vec<Sale>> {
    // Minutes span the 14-day window
    prop::collection::vec((0usize..4, 100u64..50_000u64, 0i64..20_160i64), 0..60).prop_map(
        |rows| {
            let mut sales: Vec<Sale> = rows
                .into_iter()
                .map(|(employee, price, minutes)| sale(employee, price, minutes))
                .collect();
            sales.sort_by_key(|s| s.service_date);
            sales
        },
    )
}

proptest! {
    #[test]
    fn test_employee_groups_partition_summary(sales in sales_strategy()) {
        let report = PeriodAggregator::default().aggregate("custom", window(), &sales, &HashMap::new());

        let services: usize = report.by_employee.iter().map(|g| g.services_count).sum();
        let revenue: Decimal = report.by_employee.iter().map(|g| g.total_revenue).sum();
        let commission: Decimal = report.by_employee.iter().map(|g| g.total_commission).sum();
        let earnings: Decimal = report.by_employee.iter().map(|g| g.business_earnings).sum();

        prop_assert_eq!(services, report.summary.total_services);
        prop_assert_eq!(revenue, report.summary.total_revenue);
        prop_assert_eq!(commission, report.summary.total_commission);
        prop_assert_eq!(earnings, report.summary.total_business_earnings);
    }

    #[test]
    fn test_day_groups_partition_summary(sales in sales_strategy()) {
        let report = PeriodAggregator::default().aggregate("custom", window(), &sales, &HashMap::new());

        let services: usize = report.by_day.iter().map(|d| d.services_count).sum();
        let revenue: Decimal = report.by_day.iter().map(|d| d.total_revenue).sum();
        prop_assert_eq!(services, sales.len());
        prop_assert_eq!(revenue, report.summary.total_revenue);

        // Input is chronological, so first-seen order is date order
        let dates: Vec<_> = report.by_day.iter().map(|d| d.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        prop_assert_eq!(dates, sorted);
    }

    #[test]
    fn test_employee_groups_sorted_by_revenue(sales in sales_strategy()) {
        let groups = PeriodAggregator::default().group_by_employee(&sales, &HashMap::new());
        for pair in groups.windows(2) {
            prop_assert!(pair[0].total_revenue >= pair[1].total_revenue);
        }
    }
}

#[test]
fn test_average_service_value_is_rounded() {
    let sales = vec![sale(0, 1000, 10), sale(0, 1000, 20), sale(1, 1001, 30)];
    let summary = PeriodAggregator::default().summary(&sales);

    // 30.01 / 3 = 10.0033...
    assert_eq!(summary.total_revenue, dec!(30.01));
    assert_eq!(summary.average_service_value, dec!(10.00));
}

#[test]
fn test_names_resolve_with_id_fallback() {
    let sales = vec![sale(0, 2000, 10), sale(1, 1500, 20)];
    let names = HashMap::from([(EMPLOYEES[0].to_string(), "Ana Torres".to_string())]);

    let groups = PeriodAggregator::default().group_by_employee(&sales, &names);
    assert_eq!(groups[0].employee_name, "Ana Torres");
    assert_eq!(groups[1].employee_name, EMPLOYEES[1]);
}

#[test]
fn test_compare_includes_employees_without_sales() {
    let mut busy = Employee::new("Ana", "Torres", dec!(45));
    busy.id = EMPLOYEES[0].to_string();
    let idle = Employee::new("Luis", "Rojas", dec!(30));

    let sales = vec![sale(0, 4000, 10), sale(0, 2000, 20)];
    let comparison = PeriodAggregator::default().compare(&[busy, idle.clone()], &sales);

    assert_eq!(comparison.len(), 2);
    assert_eq!(comparison[0].services_count, 2);
    assert_eq!(comparison[0].total_revenue, dec!(60.00));
    assert_eq!(comparison[0].average_service_value, dec!(30.00));
    assert_eq!(comparison[1].employee_id, idle.id);
    assert_eq!(comparison[1].services_count, 0);
    assert_eq!(comparison[1].total_revenue, dec!(0));
}

#[test]
fn test_offset_moves_late_sales_to_previous_day() {
    let lima = ReportingCalendar::new(ReportingCalendar::parse_offset("-05:00").unwrap());
    // 23:30 in Lima on Nov 1st is 04:30 UTC on Nov 2nd
    let late = sale(0, 2500, 24 * 60 + 4 * 60 + 30);

    let days = PeriodAggregator::new(lima).group_by_day(&[late]);
    assert_eq!(days[0].date, chrono::NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
}
