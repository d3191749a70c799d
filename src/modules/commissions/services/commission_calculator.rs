use rust_decimal::Decimal;

use crate::core::error::AppError;
use crate::core::money;
use crate::modules::commissions::models::{CommissionBearing, CommissionSplit, SalesTotals};

/// CommissionCalculator splits a price between staff commission and business earnings
///
/// Stateless; every method is a pure function of its arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommissionCalculator;

impl CommissionCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Calculate the commission split for a price
    ///
    /// # Arguments
    /// * `price` - Final chargeable price in `[0, money::MAX_AMOUNT]`
    /// * `commission_rate` - Percentage in `[0, 100]`
    ///
    /// # Returns
    /// * `commission_amount = round2(price * rate / 100)`
    /// * `business_earnings = round2(price - commission_amount)`
    pub fn calculate_commission(
        &self,
        price: Decimal,
        commission_rate: Decimal,
    ) -> Result<CommissionSplit, AppError> {
        if price < Decimal::ZERO {
            return Err(AppError::invalid_input(format!(
                "Price cannot be negative, got {}",
                price
            )));
        }
        if money::exceeds_max(price) {
            return Err(AppError::invalid_input(format!(
                "Price cannot exceed {}, got {}",
                money::MAX_AMOUNT,
                price
            )));
        }
        self.validate_commission_rate(commission_rate)?;

        let commission_amount = money::round2(price * commission_rate / Decimal::ONE_HUNDRED);
        let business_earnings = money::round2(price - commission_amount);

        Ok(CommissionSplit {
            commission_amount,
            business_earnings,
        })
    }

    /// Commission rate must be a percentage between 0 and 100
    pub fn validate_commission_rate(&self, commission_rate: Decimal) -> Result<(), AppError> {
        if commission_rate < Decimal::ZERO || commission_rate > Decimal::ONE_HUNDRED {
            return Err(AppError::invalid_input(format!(
                "Commission rate must be between 0 and 100, got {}",
                commission_rate
            )));
        }
        Ok(())
    }

    /// True when the submitted price is within one cent of the expected price
    pub fn validate_price_integrity(&self, submitted: Decimal, expected: Decimal) -> bool {
        self.validate_price_integrity_within(submitted, expected, money::price_tolerance())
    }

    pub fn validate_price_integrity_within(
        &self,
        submitted: Decimal,
        expected: Decimal,
        tolerance: Decimal,
    ) -> bool {
        (submitted - expected).abs() <= tolerance
    }

    /// Fold rows into revenue, commission and business earnings totals
    ///
    /// Business earnings are summed per row from already-rounded fields; the
    /// aggregate is never re-rounded.
    pub fn calculate_totals<T: CommissionBearing>(&self, rows: &[T]) -> SalesTotals {
        rows.iter().fold(SalesTotals::default(), |mut totals, row| {
            totals.add(row);
            totals
        })
    }
}
