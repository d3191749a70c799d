// Earnings and withdrawal ledger

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{
    AccountType, Balance, BankAccount, BankAccountSnapshot, EmployeeEarnings, Withdrawal,
    WithdrawalDraft, WithdrawalReceipt, WithdrawalStatus,
};
pub use repositories::{MySqlWithdrawalRepository, WithdrawalRepository};
pub use services::EarningsService;
