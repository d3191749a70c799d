// Test data factory
//
// Identity headers must carry uuids, so every id here is a fresh v4.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use uuid::Uuid;

use salonledger::modules::catalog::models::ServiceType;
use salonledger::modules::employees::models::Employee;
use salonledger::modules::sales::models::NewSaleRequest;
use salonledger::modules::withdrawals::models::{AccountType, BankAccount, WithdrawalRequest};

pub struct TestDataFactory;

impl TestDataFactory {
    /// Saturday 2025-11-15 15:00 UTC
    pub fn reference_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 15, 15, 0, 0).unwrap()
    }

    pub fn admin_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn employee(first_name: &str, rate: Decimal) -> Employee {
        Employee::new(first_name, "Test", rate)
    }

    pub fn service_type(name: &str, default_price: Decimal) -> ServiceType {
        ServiceType::new(name, default_price, 45)
    }

    pub fn sale_request(employee_id: &str, service_type_id: Option<&str>, price: Decimal) -> NewSaleRequest {
        NewSaleRequest {
            employee_id: employee_id.to_string(),
            service_type_id: service_type_id.map(str::to_string),
            price,
            client_name: "María López".to_string(),
            client_phone: Some("+51 999 888 777".to_string()),
            notes: None,
        }
    }

    pub fn bank_account() -> BankAccount {
        BankAccount {
            account_holder: "Ana Test".to_string(),
            account_number: "19312345678901".to_string(),
            bank_name: "BCP".to_string(),
            account_type: AccountType::Savings,
        }
    }

    pub fn withdrawal_request(amount: Decimal) -> WithdrawalRequest {
        WithdrawalRequest {
            amount,
            bank_account: Self::bank_account(),
            notes: None,
        }
    }

    /// JSON body for `POST /services`; amounts travel as strings
    pub fn sale_payload(employee_id: &str, service_type_id: Option<&str>, price: &str) -> Value {
        json!({
            "employee_id": employee_id,
            "service_type_id": service_type_id,
            "price": price,
            "client_name": "María López",
            "client_phone": "+51 999 888 777",
        })
    }

    /// JSON body for `POST /employees/me/withdraw`
    pub fn withdrawal_payload(amount: &str) -> Value {
        json!({
            "amount": amount,
            "bank_account": {
                "account_holder": "Ana Test",
                "account_number": "19312345678901",
                "bank_name": "BCP",
                "account_type": "savings",
            },
        })
    }
}

/// Reads a money field that may render as a JSON number or a string
pub fn json_decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().unwrap(),
        Value::Number(n) => n.to_string().parse().unwrap(),
        other => panic!("expected a decimal, got {}", other),
    }
}
