use serde::{Deserialize, Serialize};

use crate::core::AppError;

const MIN_ACCOUNT_NUMBER_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checking" => Ok(AccountType::Checking),
            "savings" => Ok(AccountType::Savings),
            other => Err(AppError::internal(format!("Unknown account type: {}", other))),
        }
    }
}

/// Destination account as submitted by the employee
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BankAccount {
    pub account_holder: String,
    pub account_number: String,
    pub bank_name: String,
    pub account_type: AccountType,
}

impl BankAccount {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.account_holder.trim().is_empty() {
            return Err(AppError::invalid_input("Account holder is required"));
        }
        if self.bank_name.trim().is_empty() {
            return Err(AppError::invalid_input("Bank name is required"));
        }
        if self.account_number.trim().chars().count() < MIN_ACCOUNT_NUMBER_LEN {
            return Err(AppError::invalid_input(format!(
                "Account number must have at least {} characters",
                MIN_ACCOUNT_NUMBER_LEN
            )));
        }
        Ok(())
    }

    /// `****` followed by the last four characters
    pub fn masked_number(&self) -> String {
        let number = self.account_number.trim();
        let chars: Vec<char> = number.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        format!("****{}", tail)
    }

    /// Only the masked number leaves this type
    pub fn snapshot(&self) -> BankAccountSnapshot {
        BankAccountSnapshot {
            account_holder: self.account_holder.trim().to_string(),
            account_number_masked: self.masked_number(),
            bank_name: self.bank_name.trim().to_string(),
            account_type: self.account_type,
        }
    }
}

/// Bank details frozen onto a withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccountSnapshot {
    pub account_holder: String,
    pub account_number_masked: String,
    pub bank_name: String,
    pub account_type: AccountType,
}
