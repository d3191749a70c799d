use rust_decimal::Decimal;

use crate::core::error::AppError;
use crate::core::money;
use crate::modules::catalog::models::ServiceType;
use crate::modules::commissions::models::CommissionSplit;
use crate::modules::commissions::services::CommissionCalculator;

/// Final price and commission for a new sale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedSale {
    pub requested_price: Decimal,
    pub final_price: Decimal,
    pub commission_rate: Decimal,
    pub split: CommissionSplit,
    /// Requested price exceeded the ceiling by more than the integrity tolerance
    pub clamped: bool,
}

/// Client-submitted prices may discount a catalog service but never exceed it
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingGuard {
    calculator: CommissionCalculator,
}

impl PricingGuard {
    pub fn new(calculator: CommissionCalculator) -> Self {
        Self { calculator }
    }

    /// Price a sale request
    ///
    /// # Arguments
    /// * `requested_price` - Price submitted by the client
    /// * `ceiling` - Resolved catalog entry, if the sale references one
    /// * `commission_rate` - The employee's current rate, frozen onto the sale
    pub fn price(
        &self,
        requested_price: Decimal,
        ceiling: Option<&ServiceType>,
        commission_rate: Decimal,
    ) -> Result<PricedSale, AppError> {
        if money::exceeds_max(requested_price) {
            return Err(AppError::invalid_price(format!(
                "Sale price cannot exceed {}, got {}",
                money::MAX_AMOUNT,
                requested_price
            )));
        }

        let (final_price, clamped) = match ceiling {
            Some(service_type) => {
                let final_price = requested_price.min(service_type.default_price);
                let clamped = !self
                    .calculator
                    .validate_price_integrity(requested_price, final_price);
                (final_price, clamped)
            }
            None => (requested_price, false),
        };

        let final_price = money::round2(final_price);
        if final_price <= Decimal::ZERO {
            return Err(AppError::invalid_price(format!(
                "Sale price must be greater than 0, got {}",
                final_price
            )));
        }

        let split = self
            .calculator
            .calculate_commission(final_price, commission_rate)?;

        Ok(PricedSale {
            requested_price,
            final_price,
            commission_rate,
            split,
            clamped,
        })
    }
}
