use std::sync::Arc;

use crate::core::{AppError, Clock, Result};
use crate::modules::commissions::services::CommissionCalculator;
use crate::modules::employees::models::{
    Employee, EmployeePatch, NewEmployeeRequest, DEFAULT_COMMISSION_RATE,
};
use crate::modules::employees::repositories::EmployeeRepository;

const MIN_NAME_LEN: usize = 2;

/// Admin management of employee records
///
/// Employees are never hard-deleted: sales and withdrawals keep referencing
/// them, so removal only clears `is_active`.
pub struct EmployeeService {
    employees: Arc<dyn EmployeeRepository>,
    calculator: CommissionCalculator,
    clock: Arc<dyn Clock>,
}

impl EmployeeService {
    pub fn new(employees: Arc<dyn EmployeeRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            employees,
            calculator: CommissionCalculator::new(),
            clock,
        }
    }

    pub async fn create_employee(
        &self,
        request: NewEmployeeRequest,
        created_by: &str,
    ) -> Result<Employee> {
        let first_name = validate_name("First name", &request.first_name)?;
        let last_name = validate_name("Last name", &request.last_name)?;
        let commission_rate = request.commission_rate.unwrap_or(DEFAULT_COMMISSION_RATE);
        self.calculator.validate_commission_rate(commission_rate)?;

        let now = self.clock.now();
        let employee = Employee {
            created_at: now,
            updated_at: now,
            ..Employee::new(first_name, last_name, commission_rate)
        };

        self.employees.save(&employee).await?;

        tracing::info!(
            employee_id = %employee.id,
            commission_rate = %employee.commission_rate,
            created_by = %created_by,
            "Employee created"
        );

        Ok(employee)
    }

    pub async fn list_employees(&self, include_inactive: bool) -> Result<Vec<Employee>> {
        if include_inactive {
            self.employees.list_all().await
        } else {
            self.employees.list_active().await
        }
    }

    pub async fn get_employee(&self, id: &str) -> Result<Employee> {
        self.employees
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Employee {} not found", id)))
    }

    /// Apply an admin edit
    ///
    /// A new commission rate only applies to sales recorded afterwards;
    /// existing sales keep the rate frozen on them.
    pub async fn update_employee(
        &self,
        id: &str,
        patch: EmployeePatch,
        updated_by: &str,
    ) -> Result<Employee> {
        let mut employee = self.get_employee(id).await?;
        if patch.is_empty() {
            return Ok(employee);
        }

        if let Some(first_name) = patch.first_name {
            employee.first_name = validate_name("First name", &first_name)?;
        }
        if let Some(last_name) = patch.last_name {
            employee.last_name = validate_name("Last name", &last_name)?;
        }
        if let Some(commission_rate) = patch.commission_rate {
            self.calculator.validate_commission_rate(commission_rate)?;
            employee.commission_rate = commission_rate;
        }
        if let Some(is_active) = patch.is_active {
            employee.is_active = is_active;
        }

        employee.updated_at = self.clock.now();
        self.employees.save(&employee).await?;

        tracing::info!(
            employee_id = %employee.id,
            commission_rate = %employee.commission_rate,
            is_active = employee.is_active,
            updated_by = %updated_by,
            "Employee updated"
        );

        Ok(employee)
    }

    /// Soft delete; already inactive employees are returned unchanged
    pub async fn deactivate_employee(&self, id: &str, deactivated_by: &str) -> Result<Employee> {
        let mut employee = self.get_employee(id).await?;
        if !employee.is_active {
            return Ok(employee);
        }

        employee.is_active = false;
        employee.updated_at = self.clock.now();
        self.employees.save(&employee).await?;

        tracing::info!(
            employee_id = %employee.id,
            deactivated_by = %deactivated_by,
            "Employee deactivated"
        );

        Ok(employee)
    }
}

fn validate_name(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.chars().count() < MIN_NAME_LEN {
        return Err(AppError::invalid_input(format!(
            "{} must have at least {} characters",
            field, MIN_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}
