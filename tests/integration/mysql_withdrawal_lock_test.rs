//! Row-lock admission against a real MySQL database
//!
//! Run with `cargo test --test mysql_withdrawal_lock_test -- --ignored`
//! and TEST_DATABASE_URL pointing at a disposable database.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use rust_decimal_macros::dec;

use helpers::{create_test_pool, TestDataFactory};
use salonledger::app::{AppState, Repositories, ServiceSettings};
use salonledger::core::{AppError, Clock, SystemClock};
use salonledger::modules::health::HealthState;
use salonledger::modules::notifications::services::EventPublisher;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires MySQL"]
async fn test_concurrent_admit_serializes_on_employee_row() {
    let pool = create_test_pool().await;
    let repos = Repositories::mysql(pool.clone());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let employee = TestDataFactory::employee("Ana", dec!(50));
    repos.employees.save(&employee).await.unwrap();

    let state = AppState::new(
        repos,
        ServiceSettings::default(),
        clock.clone(),
        Arc::new(EventPublisher::new(clock)),
        HealthState::mysql(pool.clone()),
    );

    state
        .sales
        .price_sale(
            TestDataFactory::sale_request(&employee.id, None, dec!(40.00)),
            &TestDataFactory::admin_id(),
        )
        .await
        .unwrap();

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let earnings = Arc::clone(&state.earnings);
            let id = employee.id.clone();
            tokio::spawn(async move {
                earnings
                    .request_withdrawal(&id, TestDataFactory::withdrawal_request(dec!(20.00)))
                    .await
            })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(AppError::InsufficientBalance { .. }) | Err(AppError::Conflict(_)) => {}
            Err(other) => panic!("unexpected error {:?}", other),
        }
    }
    assert_eq!(accepted, 1);

    let balance = state
        .earnings
        .employee_balance(&employee.id, None)
        .await
        .unwrap();
    assert_eq!(balance.balance.total_withdrawn, dec!(20.00));
    assert_eq!(balance.balance.available_balance, dec!(0));

    // Leave the database reusable
    sqlx::query("DELETE FROM withdrawals WHERE employee_id = ?")
        .bind(&employee.id)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM sales WHERE employee_id = ?")
        .bind(&employee.id)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(&employee.id)
        .execute(&pool)
        .await
        .unwrap();
}
