//! Integration tests for employee balances and the withdrawal ledger

#[path = "../helpers/mod.rs"]
mod helpers;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use helpers::{TestContext, TestDataFactory};
use salonledger::core::{AppError, Period};
use salonledger::modules::employees::models::Employee;
use salonledger::modules::withdrawals::models::{ReviewWithdrawalRequest, WithdrawalStatus};

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

#[tokio::test]
async fn test_balance_scenario() {
    let ctx = TestContext::new();
    let ana = ctx.seed_employee("Ana", dec!(50)).await;
    record(&ctx, &ana, dec!(25.00), 2).await;

    let earnings = ctx
        .state
        .earnings
        .employee_balance(&ana.id, None)
        .await
        .unwrap();
    assert_eq!(earnings.balance.total_commission, dec!(12.50));
    assert_eq!(earnings.balance.total_withdrawn, dec!(0));
    assert_eq!(earnings.balance.available_balance, dec!(12.50));
    assert_eq!(earnings.total_business_earnings, dec!(12.50));

    let too_much = ctx
        .state
        .earnings
        .request_withdrawal(&ana.id, TestDataFactory::withdrawal_request(dec!(13.00)))
        .await
        .unwrap_err();
    match too_much {
        AppError::InsufficientBalance {
            requested,
            available,
        } => {
            assert_eq!(requested, dec!(13.00));
            assert_eq!(available, dec!(12.50));
        }
        other => panic!("expected InsufficientBalance, got {:?}", other),
    }
    assert_eq!(ctx.store.withdrawal_count().await, 0);

    let receipt = ctx
        .state
        .earnings
        .request_withdrawal(&ana.id, TestDataFactory::withdrawal_request(dec!(12.50)))
        .await
        .unwrap();
    assert_eq!(receipt.available_balance, dec!(0.00));
    assert_eq!(receipt.withdrawal.status, WithdrawalStatus::Pending);
    assert_eq!(receipt.withdrawal.bank_account.account_number_masked, "****8901");
    assert!(receipt.withdrawal.operation_number.starts_with("WD-20251115-150000-"));

    let after = ctx
        .state
        .earnings
        .employee_balance(&ana.id, None)
        .await
        .unwrap();
    assert_eq!(after.balance.available_balance, dec!(0));
    assert_eq!(after.balance.total_withdrawn, dec!(12.50));
    assert_eq!(ctx.events.names().last().map(String::as_str), Some("withdrawal_requested"));
}

#[tokio::test]
async fn test_withdrawal_amount_validation() {
    let ctx = TestContext::new();
    let ana = ctx.seed_employee("Ana", dec!(50)).await;
    record(&ctx, &ana, dec!(100.00), 1).await;

    for amount in [dec!(0), dec!(-5.00), dec!(1.005), Decimal::MAX] {
        let err = ctx
            .state
            .earnings
            .request_withdrawal(&ana.id, TestDataFactory::withdrawal_request(amount))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)), "amount {}", amount);
    }

    let mut short_account = TestDataFactory::withdrawal_request(dec!(5.00));
    short_account.bank_account.account_number = "123".to_string();
    let err = ctx
        .state
        .earnings
        .request_withdrawal(&ana.id, short_account)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    let unknown = ctx
        .state
        .earnings
        .request_withdrawal(
            &uuid::Uuid::new_v4().to_string(),
            TestDataFactory::withdrawal_request(dec!(5.00)),
        )
        .await
        .unwrap_err();
    assert!(matches!(unknown, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_review_lifecycle() {
    let ctx = TestContext::new();
    let ana = ctx.seed_employee("Ana", dec!(50)).await;
    record(&ctx, &ana, dec!(40.00), 1).await;

    let first = ctx
        .state
        .earnings
        .request_withdrawal(&ana.id, TestDataFactory::withdrawal_request(dec!(20.00)))
        .await
        .unwrap();

    let rejected = ctx
        .state
        .earnings
        .review_withdrawal(
            &first.withdrawal.id,
            ReviewWithdrawalRequest {
                status: WithdrawalStatus::Rejected,
                notes: Some("Cuenta no coincide".to_string()),
            },
            &ctx.admin_id,
        )
        .await
        .unwrap();
    assert_eq!(rejected.status, WithdrawalStatus::Rejected);
    assert_eq!(rejected.reviewed_by.as_deref(), Some(ctx.admin_id.as_str()));
    assert_eq!(rejected.reviewed_at, Some(TestDataFactory::reference_now()));

    // Rejected money is available again
    let balance = ctx
        .state
        .earnings
        .employee_balance(&ana.id, None)
        .await
        .unwrap();
    assert_eq!(balance.balance.available_balance, dec!(20.00));

    let again = ctx
        .state
        .earnings
        .review_withdrawal(
            &first.withdrawal.id,
            ReviewWithdrawalRequest {
                status: WithdrawalStatus::Approved,
                notes: None,
            },
            &ctx.admin_id,
        )
        .await
        .unwrap_err();
    assert!(matches!(again, AppError::InvalidInput(_)));

    let missing = ctx
        .state
        .earnings
        .review_withdrawal(
            "no-such-withdrawal",
            ReviewWithdrawalRequest {
                status: WithdrawalStatus::Approved,
                notes: None,
            },
            &ctx.admin_id,
        )
        .await
        .unwrap_err();
    assert!(matches!(missing, AppError::NotFound(_)));

    // Approved withdrawals keep counting against the balance
    let second = ctx
        .state
        .earnings
        .request_withdrawal(&ana.id, TestDataFactory::withdrawal_request(dec!(20.00)))
        .await
        .unwrap();
    ctx.state
        .earnings
        .review_withdrawal(
            &second.withdrawal.id,
            ReviewWithdrawalRequest {
                status: WithdrawalStatus::Approved,
                notes: None,
            },
            &ctx.admin_id,
        )
        .await
        .unwrap();
    let balance = ctx
        .state
        .earnings
        .employee_balance(&ana.id, None)
        .await
        .unwrap();
    assert_eq!(balance.balance.available_balance, dec!(0));

    let history = ctx
        .state
        .earnings
        .list_withdrawals(&ana.id, None)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn test_balance_window_is_trailing_month() {
    let ctx = TestContext::new();
    let ana = ctx.seed_employee("Ana", dec!(50)).await;
    record(&ctx, &ana, dec!(100.00), 24 * 40).await;
    record(&ctx, &ana, dec!(10.00), 24 * 3).await;

    let month = ctx
        .state
        .earnings
        .employee_balance(&ana.id, None)
        .await
        .unwrap();
    assert_eq!(month.balance.total_commission, dec!(5.00));

    let week = ctx
        .state
        .earnings
        .employee_balance(&ana.id, Some(ctx.state.earnings.period_window(Period::Weekly)))
        .await
        .unwrap();
    assert_eq!(week.total_services, 1);

    let explicit = ctx
        .state
        .earnings
        .date_window(
            NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 11, 15).unwrap(),
        )
        .unwrap();
    let all = ctx
        .state
        .earnings
        .employee_balance(&ana.id, Some(explicit))
        .await
        .unwrap();
    assert_eq!(all.balance.total_commission, dec!(55.00));

    // Commission older than a month cannot be withdrawn
    let err = ctx
        .state
        .earnings
        .request_withdrawal(&ana.id, TestDataFactory::withdrawal_request(dec!(6.00)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientBalance { .. }));
}

#[tokio::test]
async fn test_all_employees_earnings() {
    let ctx = TestContext::new();
    let ana = ctx.seed_employee("Ana", dec!(50)).await;
    let bea = ctx.seed_employee("Bea", dec!(20)).await;
    ctx.seed_inactive_employee("Zoe", dec!(20)).await;
    record(&ctx, &ana, dec!(30.00), 2).await;
    record(&ctx, &bea, dec!(50.00), 2).await;

    let earnings = ctx
        .state
        .earnings
        .all_employees_earnings(Period::Daily)
        .await
        .unwrap();

    assert_eq!(earnings.len(), 2);
    assert_eq!(earnings[0].employee_name, "Ana Test");
    assert_eq!(earnings[0].balance.total_commission, dec!(15.00));
    assert_eq!(earnings[1].balance.total_commission, dec!(10.00));
    assert_eq!(earnings[1].total_revenue, dec!(50.00));
}
