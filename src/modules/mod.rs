pub mod catalog;
pub mod commissions;
pub mod employees;
pub mod health;
pub mod notifications;
pub mod reports;
pub mod sales;
pub mod withdrawals;
