pub mod withdrawal_repository;

pub use withdrawal_repository::{MySqlWithdrawalRepository, StatusChange, WithdrawalRepository};
