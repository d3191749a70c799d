//! Concurrent withdrawal requests against one balance

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use helpers::{TestContext, TestDataFactory};
use salonledger::core::AppError;

async fn seed_balance(ctx: &TestContext, price: Decimal) -> String {
    let ana = ctx.seed_employee("Ana", dec!(50)).await;
    ctx.clock
        .set(TestDataFactory::reference_now() - Duration::hours(1));
    ctx.state
        .sales
        .price_sale(
            TestDataFactory::sale_request(&ana.id, None, price),
            &ctx.admin_id,
        )
        .await
        .unwrap();
    ctx.clock.set(TestDataFactory::reference_now());
    ana.id
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_requests_for_full_balance() {
    let ctx = TestContext::new();
    let employee_id = seed_balance(&ctx, dec!(25.00)).await;

    let earnings = Arc::clone(&ctx.state.earnings);
    let first = {
        let earnings = Arc::clone(&earnings);
        let id = employee_id.clone();
        tokio::spawn(async move {
            earnings
                .request_withdrawal(&id, TestDataFactory::withdrawal_request(dec!(12.50)))
                .await
        })
    };
    let second = {
        let earnings = Arc::clone(&earnings);
        let id = employee_id.clone();
        tokio::spawn(async move {
            earnings
                .request_withdrawal(&id, TestDataFactory::withdrawal_request(dec!(12.50)))
                .await
        })
    };

    let results = vec![first.await.unwrap(), second.await.unwrap()];
    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 1);

    for result in &results {
        if let Err(err) = result {
            assert!(
                matches!(
                    err,
                    AppError::InsufficientBalance { .. } | AppError::Conflict(_)
                ),
                "unexpected error {:?}",
                err
            );
        }
    }

    let balance = earnings.employee_balance(&employee_id, None).await.unwrap();
    assert_eq!(balance.balance.total_withdrawn, dec!(12.50));
    assert_eq!(balance.balance.available_balance, dec!(0));
    assert_eq!(ctx.store.withdrawal_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_requests_never_overdraw() {
    let ctx = TestContext::new();
    // 100.00 commission, twenty requests of 7.00 each
    let employee_id = seed_balance(&ctx, dec!(200.00)).await;

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let earnings = Arc::clone(&ctx.state.earnings);
            let id = employee_id.clone();
            tokio::spawn(async move {
                earnings
                    .request_withdrawal(&id, TestDataFactory::withdrawal_request(dec!(7.00)))
                    .await
            })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(receipt) => {
                accepted += 1;
                assert!(receipt.available_balance >= Decimal::ZERO);
            }
            Err(AppError::InsufficientBalance { available, .. }) => {
                assert!(available < dec!(7.00));
            }
            Err(other) => panic!("unexpected error {:?}", other),
        }
    }

    // floor(100 / 7)
    assert_eq!(accepted, 14);

    let balance = ctx
        .state
        .earnings
        .employee_balance(&employee_id, None)
        .await
        .unwrap();
    assert_eq!(balance.balance.total_withdrawn, dec!(98.00));
    assert_eq!(balance.balance.available_balance, dec!(2.00));
}
