use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money;

/// Staff commission and business share of one price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionSplit {
    pub commission_amount: Decimal,
    pub business_earnings: Decimal,
}

/// Anything carrying a price and an already-rounded commission
pub trait CommissionBearing {
    fn price(&self) -> Decimal;
    fn commission_amount(&self) -> Decimal;

    fn business_earnings(&self) -> Decimal {
        self.price() - self.commission_amount()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesTotals {
    pub total_services: usize,
    pub total_revenue: Decimal,
    pub total_commission: Decimal,
    pub total_business_earnings: Decimal,
}

impl Default for SalesTotals {
    fn default() -> Self {
        Self {
            total_services: 0,
            total_revenue: money::zero(),
            total_commission: money::zero(),
            total_business_earnings: money::zero(),
        }
    }
}

impl SalesTotals {
    /// Adds one row without re-rounding
    pub fn add<T: CommissionBearing + ?Sized>(&mut self, row: &T) {
        self.total_services += 1;
        self.total_revenue += row.price();
        self.total_commission += row.commission_amount();
        self.total_business_earnings += row.business_earnings();
    }

    /// `total_revenue / total_services`, rounded to cents; zero when empty
    pub fn average_service_value(&self) -> Decimal {
        if self.total_services == 0 {
            return money::zero();
        }
        money::round2(self.total_revenue / Decimal::from(self.total_services))
    }
}
