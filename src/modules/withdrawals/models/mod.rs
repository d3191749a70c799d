pub mod bank_account;
pub mod earnings;
pub mod withdrawal;

pub use bank_account::{AccountType, BankAccount, BankAccountSnapshot};
pub use earnings::{Balance, EmployeeEarnings};
pub use withdrawal::{
    OperationNumber, ReviewWithdrawalRequest, Withdrawal, WithdrawalDraft, WithdrawalReceipt,
    WithdrawalRequest, WithdrawalStatus,
};
