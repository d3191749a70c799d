use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::core::{AppError, Result, TimeWindow};
use crate::modules::catalog::models::ServiceType;
use crate::modules::catalog::repositories::ServiceTypeRepository;
use crate::modules::employees::models::Employee;
use crate::modules::employees::repositories::EmployeeRepository;
use crate::modules::sales::models::{Sale, SaleFilters, SaleOrder};
use crate::modules::sales::repositories::SaleRepository;
use crate::modules::withdrawals::models::{
    Balance, Withdrawal, WithdrawalDraft, WithdrawalReceipt,
};
use crate::modules::withdrawals::repositories::{StatusChange, WithdrawalRepository};

#[derive(Debug, Default)]
struct Tables {
    employees: HashMap<String, Employee>,
    service_types: HashMap<String, ServiceType>,
    /// Insertion order is kept so equal timestamps sort stably
    sales: Vec<Sale>,
    withdrawals: Vec<Withdrawal>,
}

impl Tables {
    fn total_commission(&self, employee_id: &str, window: &TimeWindow) -> Decimal {
        self.sales
            .iter()
            .filter(|s| s.employee_id == employee_id && window.contains(s.service_date))
            .map(|s| s.commission_amount)
            .sum()
    }

    fn total_withdrawn(&self, employee_id: &str, window: &TimeWindow) -> Decimal {
        self.withdrawals
            .iter()
            .filter(|w| {
                w.employee_id == employee_id
                    && w.status.counts_against_balance()
                    && window.contains(w.created_at)
            })
            .map(|w| w.amount)
            .sum()
    }
}

/// Single-process store backing every repository trait
///
/// One mutex guards all tables, so each repository call is atomic with
/// respect to every other call. Used for local runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sale_count(&self) -> usize {
        self.tables.lock().await.sales.len()
    }

    pub async fn withdrawal_count(&self) -> usize {
        self.tables.lock().await.withdrawals.len()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>> {
        Ok(self.tables.lock().await.employees.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Employee>> {
        let tables = self.tables.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.employees.get(id).cloned())
            .collect())
    }

    async fn list_active(&self) -> Result<Vec<Employee>> {
        let tables = self.tables.lock().await;
        let mut active: Vec<Employee> = tables
            .employees
            .values()
            .filter(|e| e.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| {
            (&a.first_name, &a.last_name, &a.id).cmp(&(&b.first_name, &b.last_name, &b.id))
        });
        Ok(active)
    }

    async fn list_all(&self) -> Result<Vec<Employee>> {
        let tables = self.tables.lock().await;
        let mut all: Vec<Employee> = tables.employees.values().cloned().collect();
        all.sort_by(|a, b| {
            (&a.first_name, &a.last_name, &a.id).cmp(&(&b.first_name, &b.last_name, &b.id))
        });
        Ok(all)
    }

    async fn save(&self, employee: &Employee) -> Result<()> {
        self.tables
            .lock()
            .await
            .employees
            .insert(employee.id.clone(), employee.clone());
        Ok(())
    }
}

#[async_trait]
impl ServiceTypeRepository for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<ServiceType>> {
        Ok(self.tables.lock().await.service_types.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<ServiceType>> {
        let tables = self.tables.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.service_types.get(id).cloned())
            .collect())
    }

    async fn list_catalog(&self, include_inactive: bool) -> Result<Vec<ServiceType>> {
        let tables = self.tables.lock().await;
        let mut catalog: Vec<ServiceType> = tables
            .service_types
            .values()
            .filter(|st| include_inactive || st.is_active)
            .cloned()
            .collect();
        catalog.sort_by(|a, b| (&a.name, &a.id).cmp(&(&b.name, &b.id)));
        Ok(catalog)
    }

    async fn save(&self, service_type: &ServiceType) -> Result<()> {
        self.tables
            .lock()
            .await
            .service_types
            .insert(service_type.id.clone(), service_type.clone());
        Ok(())
    }
}

#[async_trait]
impl SaleRepository for InMemoryStore {
    async fn insert(&self, sale: &Sale) -> Result<()> {
        let mut tables = self.tables.lock().await;
        if tables.sales.iter().any(|s| s.id == sale.id) {
            return Err(AppError::conflict(format!("Sale {} already exists", sale.id)));
        }
        tables.sales.push(sale.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Sale>> {
        let tables = self.tables.lock().await;
        Ok(tables.sales.iter().find(|s| s.id == id).cloned())
    }

    async fn list(&self, filters: &SaleFilters) -> Result<Vec<Sale>> {
        let tables = self.tables.lock().await;
        let mut sales: Vec<Sale> = tables
            .sales
            .iter()
            .filter(|s| filters.matches(s))
            .cloned()
            .collect();

        match filters.order {
            SaleOrder::Chronological => sales.sort_by_key(|s| s.service_date),
            SaleOrder::MostRecentFirst => {
                sales.reverse();
                sales.sort_by(|a, b| b.service_date.cmp(&a.service_date));
            }
        }

        if let Some(limit) = filters.limit {
            sales.truncate(limit);
        }

        Ok(sales)
    }

    async fn update(&self, sale: &Sale) -> Result<()> {
        let mut tables = self.tables.lock().await;
        let existing = tables
            .sales
            .iter_mut()
            .find(|s| s.id == sale.id)
            .ok_or_else(|| AppError::not_found(format!("Sale {} not found", sale.id)))?;
        *existing = sale.clone();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.sales.len();
        tables.sales.retain(|s| s.id != id);
        Ok(tables.sales.len() != before)
    }
}

#[async_trait]
impl WithdrawalRepository for InMemoryStore {
    async fn total_withdrawn(&self, employee_id: &str, window: &TimeWindow) -> Result<Decimal> {
        Ok(self.tables.lock().await.total_withdrawn(employee_id, window))
    }

    async fn admit(&self, draft: WithdrawalDraft, window: &TimeWindow) -> Result<WithdrawalReceipt> {
        // Held across read, check and insert
        let mut tables = self.tables.lock().await;

        if !tables.employees.contains_key(&draft.employee_id) {
            return Err(AppError::not_found(format!(
                "Employee {} not found",
                draft.employee_id
            )));
        }
        if tables
            .withdrawals
            .iter()
            .any(|w| w.operation_number == draft.operation_number)
        {
            return Err(AppError::conflict(format!(
                "Operation number {} already issued",
                draft.operation_number
            )));
        }

        let balance = Balance::new(
            tables.total_commission(&draft.employee_id, window),
            tables.total_withdrawn(&draft.employee_id, window),
        );
        let remaining = balance.admit(draft.amount)?;

        let withdrawal = draft.into_pending();
        tables.withdrawals.push(withdrawal.clone());

        Ok(WithdrawalReceipt {
            withdrawal,
            available_balance: remaining,
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Withdrawal>> {
        let tables = self.tables.lock().await;
        Ok(tables.withdrawals.iter().find(|w| w.id == id).cloned())
    }

    async fn list_by_employee(&self, employee_id: &str, limit: Option<usize>) -> Result<Vec<Withdrawal>> {
        let tables = self.tables.lock().await;
        let mut withdrawals: Vec<Withdrawal> = tables
            .withdrawals
            .iter()
            .rev()
            .filter(|w| w.employee_id == employee_id)
            .cloned()
            .collect();
        withdrawals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            withdrawals.truncate(limit);
        }
        Ok(withdrawals)
    }

    async fn update_status(&self, id: &str, change: StatusChange) -> Result<Withdrawal> {
        let mut tables = self.tables.lock().await;
        let withdrawal = tables
            .withdrawals
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| AppError::not_found(format!("Withdrawal {} not found", id)))?;

        if withdrawal.status != change.from {
            return Err(AppError::conflict(format!(
                "Withdrawal {} is already {}",
                id, withdrawal.status
            )));
        }

        withdrawal.status = change.to;
        withdrawal.reviewed_at = Some(change.reviewed_at);
        withdrawal.reviewed_by = Some(change.reviewed_by);
        if change.notes.is_some() {
            withdrawal.notes = change.notes;
        }

        Ok(withdrawal.clone())
    }
}
