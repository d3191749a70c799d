// Commission split arithmetic shared by sales, reports and earnings

pub mod models;
pub mod services;

pub use models::{CommissionBearing, CommissionSplit, SalesTotals};
pub use services::CommissionCalculator;
