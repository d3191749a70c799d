use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places carried by every persisted amount
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a `DECIMAL(12,2)` column holds: 9,999,999,999.99
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, MONEY_SCALE);

/// True when the amount cannot be stored or safely multiplied
pub fn exceeds_max(amount: Decimal) -> bool {
    amount > MAX_AMOUNT
}

/// Default tolerance for client-declared price checks (one cent)
pub fn price_tolerance() -> Decimal {
    Decimal::new(1, MONEY_SCALE)
}

/// Zero with money scale, so empty sums render as `0.00`
pub fn zero() -> Decimal {
    Decimal::new(0, MONEY_SCALE)
}

/// Rounds to two decimal places, half away from zero, and pins the scale to 2
pub fn round2(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}
