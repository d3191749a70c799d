//! Integration tests for period reports and the employee comparison

#[path = "../helpers/mod.rs"]
mod helpers;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use helpers::{TestContext, TestDataFactory};
use salonledger::core::{AppError, Period, ReportingCalendar};
use salonledger::modules::employees::models::Employee;
use salonledger::modules::reports::models::CUSTOM_SERVICE_LABEL;

async fn record(ctx: &TestContext, employee: &Employee, price: Decimal, hours_ago: i64) {
    ctx.clock
        .set(TestDataFactory::reference_now() - Duration::hours(hours_ago));
    ctx.state
        .sales
        .price_sale(
            TestDataFactory::sale_request(&employee.id, None, price),
            &ctx.admin_id,
        )
        .await
        .unwrap();
    ctx.clock.set(TestDataFactory::reference_now());
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, day).unwrap()
}

#[tokio::test]
async fn test_empty_period_report() {
    let ctx = TestContext::new();

    let report = ctx
        .state
        .reports
        .custom_report(date(1), date(30))
        .await
        .unwrap();

    assert_eq!(report.label, "custom");
    assert_eq!(report.summary.total_services, 0);
    assert_eq!(report.summary.total_revenue, dec!(0));
    assert_eq!(report.summary.average_service_value, dec!(0));
    assert!(report.by_employee.is_empty());
    assert!(report.by_day.is_empty());
}

#[tokio::test]
async fn test_weekly_report_groups_by_employee_and_day() {
    let ctx = TestContext::new();
    let ana = ctx.seed_employee("Ana", dec!(50)).await;
    let luis = ctx.seed_employee("Luis", dec!(40)).await;

    // Reference now is 2025-11-15 15:00 UTC
    record(&ctx, &ana, dec!(25.00), 2).await; // 15th
    record(&ctx, &luis, dec!(60.00), 26).await; // 14th
    record(&ctx, &ana, dec!(30.00), 27).await; // 14th
    record(&ctx, &ana, dec!(99.00), 24 * 8).await; // 7th, outside the week

    let report = ctx
        .state
        .reports
        .period_report(Period::Weekly, None)
        .await
        .unwrap();

    assert_eq!(report.label, "weekly");
    assert_eq!(report.summary.total_services, 3);
    assert_eq!(report.summary.total_revenue, dec!(115.00));
    assert_eq!(report.summary.total_commission, dec!(51.50));
    assert_eq!(report.summary.total_business_earnings, dec!(63.50));
    assert_eq!(report.summary.average_service_value, dec!(38.33));

    // Luis leads on revenue
    assert_eq!(report.by_employee.len(), 2);
    assert_eq!(report.by_employee[0].employee_id, luis.id);
    assert_eq!(report.by_employee[0].employee_name, "Luis Test");
    assert_eq!(report.by_employee[1].total_revenue, dec!(55.00));

    let days: Vec<NaiveDate> = report.by_day.iter().map(|d| d.date).collect();
    assert_eq!(days, vec![date(14), date(15)]);
    assert_eq!(report.by_day[0].services_count, 2);
}

#[tokio::test]
async fn test_named_periods_end_on_given_date() {
    let ctx = TestContext::new();
    let ana = ctx.seed_employee("Ana", dec!(50)).await;
    record(&ctx, &ana, dec!(20.00), 24 * 10).await; // 5th

    let daily = ctx.state.reports.daily_report(Some(date(5))).await.unwrap();
    assert_eq!(daily.summary.total_services, 1);

    let weekly = ctx
        .state
        .reports
        .period_report(Period::Weekly, Some(date(11)))
        .await
        .unwrap();
    assert_eq!(weekly.summary.total_services, 1);

    let weekly_later = ctx
        .state
        .reports
        .period_report(Period::Weekly, Some(date(12)))
        .await
        .unwrap();
    assert_eq!(weekly_later.summary.total_services, 0);

    let biweekly = ctx
        .state
        .reports
        .period_report(Period::Biweekly, Some(date(18)))
        .await
        .unwrap();
    assert_eq!(biweekly.summary.total_services, 1);
}

#[tokio::test]
async fn test_custom_report_rejects_inverted_range() {
    let ctx = TestContext::new();
    let err = ctx
        .state
        .reports
        .custom_report(date(10), date(9))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[tokio::test]
async fn test_report_days_follow_reporting_offset() {
    let lima = ReportingCalendar::new(ReportingCalendar::parse_offset("-05:00").unwrap());
    let ctx = TestContext::with_calendar(lima);
    let ana = ctx.seed_employee("Ana", dec!(50)).await;

    // 2025-11-15 02:00 UTC is 21:00 on the 14th in Lima
    record(&ctx, &ana, dec!(40.00), 13).await;

    let on_14th = ctx.state.reports.daily_report(Some(date(14))).await.unwrap();
    assert_eq!(on_14th.summary.total_services, 1);
    assert_eq!(on_14th.by_day[0].date, date(14));

    let on_15th = ctx.state.reports.daily_report(Some(date(15))).await.unwrap();
    assert_eq!(on_15th.summary.total_services, 0);
}

#[tokio::test]
async fn test_employee_comparison_lists_every_active_employee() {
    let ctx = TestContext::new();
    let ana = ctx.seed_employee("Ana", dec!(50)).await;
    let _bea = ctx.seed_employee("Bea", dec!(35)).await;
    let _gone = ctx.seed_inactive_employee("Zoe", dec!(35)).await;

    record(&ctx, &ana, dec!(40.00), 3).await;
    record(&ctx, &ana, dec!(20.00), 4).await;

    let comparison = ctx
        .state
        .reports
        .employee_comparison(None, None)
        .await
        .unwrap();

    assert_eq!(comparison.len(), 2);
    assert_eq!(comparison[0].employee_name, "Ana Test");
    assert_eq!(comparison[0].services_count, 2);
    assert_eq!(comparison[0].total_commission, dec!(30.00));
    assert_eq!(comparison[0].average_service_value, dec!(30.00));
    assert_eq!(comparison[1].employee_name, "Bea Test");
    assert_eq!(comparison[1].services_count, 0);

    let half_range = ctx
        .state
        .reports
        .employee_comparison(Some(date(1)), None)
        .await
        .unwrap_err();
    assert!(matches!(half_range, AppError::InvalidInput(_)));
}

#[tokio::test]
async fn test_employee_report_is_trailing_and_newest_first() {
    let ctx = TestContext::new();
    let ana = ctx.seed_employee("Ana", dec!(50)).await;
    let corte = ctx.seed_service_type("Corte", dec!(30.00)).await;

    ctx.clock
        .set(TestDataFactory::reference_now() - Duration::hours(48));
    ctx.state
        .sales
        .price_sale(
            TestDataFactory::sale_request(&ana.id, Some(&corte.id), dec!(30.00)),
            &ctx.admin_id,
        )
        .await
        .unwrap();
    ctx.clock.set(TestDataFactory::reference_now());
    record(&ctx, &ana, dec!(18.00), 1).await;
    record(&ctx, &ana, dec!(50.00), 24 * 9).await;

    let report = ctx
        .state
        .reports
        .employee_report(&ana.id, Period::Weekly)
        .await
        .unwrap();

    assert_eq!(report.period, "weekly");
    assert_eq!(report.summary.total_services, 2);
    assert_eq!(report.services[0].service_name, CUSTOM_SERVICE_LABEL);
    assert_eq!(report.services[0].price, dec!(18.00));
    assert_eq!(report.services[1].service_name, "Corte");
    assert_eq!(report.window.end, TestDataFactory::reference_now());
    assert_eq!(
        report.window.start,
        TestDataFactory::reference_now() - Duration::days(7)
    );
}
