use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{money, AppError, TimeWindow};

/// Commission minus outstanding withdrawals over one evaluation window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub total_commission: Decimal,
    pub total_withdrawn: Decimal,
    pub available_balance: Decimal,
}

impl Balance {
    /// Available balance is floored at zero
    pub fn new(total_commission: Decimal, total_withdrawn: Decimal) -> Self {
        let available = (total_commission - total_withdrawn).max(Decimal::ZERO);
        Self {
            total_commission: money::round2(total_commission),
            total_withdrawn: money::round2(total_withdrawn),
            available_balance: money::round2(available),
        }
    }

    /// Checks a withdrawal against the balance and returns what would remain
    pub fn admit(&self, amount: Decimal) -> Result<Decimal, AppError> {
        if amount > self.available_balance {
            return Err(AppError::InsufficientBalance {
                requested: money::round2(amount),
                available: self.available_balance,
            });
        }
        Ok(money::round2(self.available_balance - amount))
    }
}

/// Earnings projection for one employee over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeEarnings {
    pub employee_id: String,
    pub employee_name: String,
    pub commission_rate: Decimal,
    pub window: TimeWindow,
    pub total_services: usize,
    pub total_revenue: Decimal,
    pub total_business_earnings: Decimal,
    #[serde(flatten)]
    pub balance: Balance,
}
