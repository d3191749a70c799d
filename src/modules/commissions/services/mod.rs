pub mod commission_calculator;

pub use commission_calculator::CommissionCalculator;
