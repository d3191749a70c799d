// Property tests for the commission split
//
// Prices are generated in whole cents and rates in hundredths of a percent,
// matching what the ledger can store.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use salonledger::core::{money, AppError};
use salonledger::modules::commissions::models::CommissionBearing;
use salonledger::modules::commissions::services::CommissionCalculator;

fn cents(value: u64) -> Decimal {
    Decimal::new(value as i64, 2)
}

struct Row {
    price: Decimal,
    commission: Decimal,
}

impl CommissionBearing for Row {
    fn price(&self) -> Decimal {
        self.price
    }

    fn commission_amount(&self) -> Decimal {
        self.commission
    }
}

proptest! {
    #[test]
    fn test_split_sums_to_price(price in 0u64..100_000_000u64, rate in 0u32..=10_000u32) {
        let price = cents(price);
        let rate = Decimal::new(rate as i64, 2);

        let split = CommissionCalculator::new().calculate_commission(price, rate).unwrap();

        prop_assert_eq!(split.commission_amount + split.business_earnings, price);
        prop_assert!(split.commission_amount >= Decimal::ZERO);
        prop_assert!(split.business_earnings >= Decimal::ZERO);
        prop_assert!(split.commission_amount <= price);
    }

    #[test]
    fn test_split_is_idempotent(price in 0u64..100_000_000u64, rate in 0u32..=100u32) {
        let calculator = CommissionCalculator::new();
        let price = cents(price);
        let rate = Decimal::from(rate);

        let first = calculator.calculate_commission(price, rate).unwrap();
        let second = calculator.calculate_commission(price, rate).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_results_carry_two_decimals(price in 0u64..10_000_000u64, rate in 0u32..=10_000u32) {
        let split = CommissionCalculator::new()
            .calculate_commission(cents(price), Decimal::new(rate as i64, 2))
            .unwrap();
        prop_assert_eq!(split.commission_amount.scale(), 2);
        prop_assert_eq!(split.business_earnings.scale(), 2);
    }

    #[test]
    fn test_rate_above_hundred_rejected(rate in 10_001u32..1_000_000u32) {
        let result = CommissionCalculator::new()
            .calculate_commission(dec!(10.00), Decimal::new(rate as i64, 2));
        prop_assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_totals_equal_row_sums(prices in prop::collection::vec(1u64..1_000_000u64, 0..40)) {
        let calculator = CommissionCalculator::new();
        let rows: Vec<Row> = prices
            .iter()
            .map(|p| {
                let price = cents(*p);
                let split = calculator.calculate_commission(price, dec!(40)).unwrap();
                Row { price, commission: split.commission_amount }
            })
            .collect();

        let totals = calculator.calculate_totals(&rows);

        let revenue: Decimal = rows.iter().map(|r| r.price).sum();
        let commission: Decimal = rows.iter().map(|r| r.commission).sum();
        prop_assert_eq!(totals.total_services, rows.len());
        prop_assert_eq!(totals.total_revenue, revenue);
        prop_assert_eq!(totals.total_commission, commission);
        prop_assert_eq!(totals.total_business_earnings, revenue - commission);
    }
}

#[test]
fn test_scenario_fifty_percent() {
    let split = CommissionCalculator::new()
        .calculate_commission(dec!(25.00), dec!(50))
        .unwrap();
    assert_eq!(split.commission_amount, dec!(12.50));
    assert_eq!(split.business_earnings, dec!(12.50));
}

#[test]
fn test_boundary_rates() {
    let calculator = CommissionCalculator::new();

    let none = calculator.calculate_commission(dec!(80.00), dec!(0)).unwrap();
    assert_eq!(none.commission_amount, dec!(0.00));
    assert_eq!(none.business_earnings, dec!(80.00));

    let all = calculator.calculate_commission(dec!(80.00), dec!(100)).unwrap();
    assert_eq!(all.commission_amount, dec!(80.00));
    assert_eq!(all.business_earnings, dec!(0.00));
}

#[test]
fn test_negative_inputs_rejected() {
    let calculator = CommissionCalculator::new();
    assert!(matches!(
        calculator.calculate_commission(dec!(-1.00), dec!(50)),
        Err(AppError::InvalidInput(_))
    ));
    assert!(matches!(
        calculator.calculate_commission(dec!(10.00), dec!(-0.01)),
        Err(AppError::InvalidInput(_))
    ));
}

#[test]
fn test_empty_totals_are_zero() {
    let totals = CommissionCalculator::new().calculate_totals::<Row>(&[]);
    assert_eq!(totals.total_services, 0);
    assert_eq!(totals.total_revenue, dec!(0));
    assert_eq!(totals.total_commission, dec!(0));
    assert_eq!(totals.total_business_earnings, dec!(0));
    assert_eq!(totals.average_service_value(), dec!(0));
}

#[test]
fn test_price_integrity_tolerance() {
    let calculator = CommissionCalculator::new();
    assert!(calculator.validate_price_integrity(dec!(35.01), dec!(35.00)));
    assert!(!calculator.validate_price_integrity(dec!(35.02), dec!(35.00)));
    assert!(calculator.validate_price_integrity_within(dec!(36.00), dec!(35.00), dec!(1.00)));
}

#[test]
fn test_largest_storable_price_splits_exactly() {
    let split = CommissionCalculator::new()
        .calculate_commission(money::MAX_AMOUNT, dec!(100))
        .unwrap();
    assert_eq!(split.commission_amount, dec!(9999999999.99));
    assert_eq!(split.business_earnings, dec!(0.00));
}

#[test]
fn test_price_above_storable_range_rejected() {
    let calculator = CommissionCalculator::new();
    for price in [dec!(10000000000.00), Decimal::MAX] {
        let result = calculator.calculate_commission(price, dec!(50));
        assert!(
            matches!(result, Err(AppError::InvalidInput(_))),
            "price {} gave {:?}",
            price,
            result
        );
    }
}
