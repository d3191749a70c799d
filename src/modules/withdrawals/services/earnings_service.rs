use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::{money, AppError, Clock, Period, ReportingCalendar, Result, TimeWindow};
use crate::modules::commissions::services::CommissionCalculator;
use crate::modules::employees::models::Employee;
use crate::modules::employees::repositories::EmployeeRepository;
use crate::modules::notifications::models::DomainEvent;
use crate::modules::notifications::services::EventPublisher;
use crate::modules::sales::models::SaleFilters;
use crate::modules::sales::repositories::SaleRepository;
use crate::modules::withdrawals::models::{
    Balance, EmployeeEarnings, OperationNumber, ReviewWithdrawalRequest, Withdrawal,
    WithdrawalDraft, WithdrawalReceipt, WithdrawalRequest, WithdrawalStatus,
};
use crate::modules::withdrawals::repositories::{StatusChange, WithdrawalRepository};

/// Earnings projections and the withdrawal ledger
pub struct EarningsService {
    withdrawals: Arc<dyn WithdrawalRepository>,
    sales: Arc<dyn SaleRepository>,
    employees: Arc<dyn EmployeeRepository>,
    calculator: CommissionCalculator,
    calendar: ReportingCalendar,
    clock: Arc<dyn Clock>,
    events: Arc<EventPublisher>,
    notify_email: Option<String>,
}

impl EarningsService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        withdrawals: Arc<dyn WithdrawalRepository>,
        sales: Arc<dyn SaleRepository>,
        employees: Arc<dyn EmployeeRepository>,
        calendar: ReportingCalendar,
        clock: Arc<dyn Clock>,
        events: Arc<EventPublisher>,
        notify_email: Option<String>,
    ) -> Self {
        Self {
            withdrawals,
            sales,
            employees,
            calculator: CommissionCalculator::new(),
            calendar,
            clock,
            events,
            notify_email,
        }
    }

    /// Window used when the caller does not pass one: one month back from now
    pub fn default_window(&self) -> TimeWindow {
        self.calendar
            .trailing_window(Period::Monthly, self.clock.now())
    }

    pub fn period_window(&self, period: Period) -> TimeWindow {
        self.calendar.trailing_window(period, self.clock.now())
    }

    /// Whole reporting days from `start` through `end`
    pub fn date_window(&self, start: NaiveDate, end: NaiveDate) -> Result<TimeWindow> {
        if start > end {
            return Err(AppError::invalid_input(
                "start_date must be before or equal to end_date",
            ));
        }
        TimeWindow::new(self.calendar.start_of_day(start), self.calendar.end_of_day(end))
    }

    /// Commission, withdrawals and available balance for one employee
    ///
    /// # Arguments
    /// * `employee_id` - Employee to evaluate
    /// * `window` - Evaluation window; defaults to the trailing month
    pub async fn employee_balance(
        &self,
        employee_id: &str,
        window: Option<TimeWindow>,
    ) -> Result<EmployeeEarnings> {
        let employee = self
            .employees
            .find_by_id(employee_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Employee {} not found", employee_id)))?;

        self.earnings_for(&employee, window.unwrap_or_else(|| self.default_window()))
            .await
    }

    /// Earnings of every active employee over a trailing period
    pub async fn all_employees_earnings(&self, period: Period) -> Result<Vec<EmployeeEarnings>> {
        let window = self.period_window(period);
        let employees = self.employees.list_active().await?;

        let mut earnings = Vec::with_capacity(employees.len());
        for employee in &employees {
            earnings.push(self.earnings_for(employee, window).await?);
        }

        Ok(earnings)
    }

    /// Request a withdrawal against the trailing-month balance
    ///
    /// The balance check and the insert run atomically in the store, so two
    /// concurrent requests can never both spend the same commission.
    pub async fn request_withdrawal(
        &self,
        employee_id: &str,
        request: WithdrawalRequest,
    ) -> Result<WithdrawalReceipt> {
        if request.amount <= Decimal::ZERO {
            return Err(AppError::invalid_input(format!(
                "Withdrawal amount must be greater than 0, got {}",
                request.amount
            )));
        }
        if money::exceeds_max(request.amount) {
            return Err(AppError::invalid_input(format!(
                "Withdrawal amount cannot exceed {}",
                money::MAX_AMOUNT
            )));
        }
        if request.amount.normalize().scale() > 2 {
            return Err(AppError::invalid_input(
                "Withdrawal amount cannot have more than 2 decimal places",
            ));
        }
        request.bank_account.validate()?;

        let now = self.clock.now();
        let window = self.calendar.trailing_window(Period::Monthly, now);

        let draft = WithdrawalDraft {
            id: Uuid::new_v4().to_string(),
            employee_id: employee_id.to_string(),
            amount: request.amount,
            bank_account: request.bank_account.snapshot(),
            operation_number: OperationNumber::generate(now, &self.calendar),
            notes: request
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            created_at: now,
        };

        let receipt = self.withdrawals.admit(draft, &window).await?;

        tracing::info!(
            withdrawal_id = %receipt.withdrawal.id,
            operation_number = %receipt.withdrawal.operation_number,
            employee_id = %employee_id,
            amount = %receipt.withdrawal.amount,
            available_balance = %receipt.available_balance,
            "Withdrawal requested"
        );

        self.events
            .publish(DomainEvent::WithdrawalRequested {
                withdrawal_id: receipt.withdrawal.id.clone(),
                operation_number: receipt.withdrawal.operation_number.clone(),
                employee_id: receipt.withdrawal.employee_id.clone(),
                amount: receipt.withdrawal.amount,
                available_balance: receipt.available_balance,
                notify: self.notify_email.clone(),
            })
            .await;

        Ok(receipt)
    }

    /// Approve or reject a pending withdrawal
    pub async fn review_withdrawal(
        &self,
        withdrawal_id: &str,
        decision: ReviewWithdrawalRequest,
        reviewed_by: &str,
    ) -> Result<Withdrawal> {
        let current = self
            .withdrawals
            .find_by_id(withdrawal_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Withdrawal {} not found", withdrawal_id)))?;

        if !current.status.can_transition_to(decision.status) {
            return Err(AppError::invalid_input(format!(
                "Cannot move withdrawal from {} to {}",
                current.status, decision.status
            )));
        }

        let reviewed = self
            .withdrawals
            .update_status(
                withdrawal_id,
                StatusChange {
                    from: WithdrawalStatus::Pending,
                    to: decision.status,
                    reviewed_at: self.clock.now(),
                    reviewed_by: reviewed_by.to_string(),
                    notes: decision.notes,
                },
            )
            .await?;

        tracing::info!(
            withdrawal_id = %reviewed.id,
            operation_number = %reviewed.operation_number,
            status = %reviewed.status,
            "Withdrawal reviewed"
        );

        self.events
            .publish(DomainEvent::WithdrawalReviewed {
                withdrawal_id: reviewed.id.clone(),
                operation_number: reviewed.operation_number.clone(),
                employee_id: reviewed.employee_id.clone(),
                status: reviewed.status,
                reviewed_by: reviewed_by.to_string(),
            })
            .await;

        Ok(reviewed)
    }

    /// An employee's withdrawals, newest first
    pub async fn list_withdrawals(&self, employee_id: &str, limit: Option<usize>) -> Result<Vec<Withdrawal>> {
        self.withdrawals.list_by_employee(employee_id, limit).await
    }

    async fn earnings_for(&self, employee: &Employee, window: TimeWindow) -> Result<EmployeeEarnings> {
        let filters = SaleFilters::between(window.start, window.end).for_employee(employee.id.clone());

        let (sales, total_withdrawn) = tokio::try_join!(
            self.sales.list(&filters),
            self.withdrawals.total_withdrawn(&employee.id, &window),
        )?;

        let totals = self.calculator.calculate_totals(&sales);

        Ok(EmployeeEarnings {
            employee_id: employee.id.clone(),
            employee_name: employee.display_name(),
            commission_rate: employee.commission_rate,
            window,
            total_services: totals.total_services,
            total_revenue: totals.total_revenue,
            total_business_earnings: totals.total_business_earnings,
            balance: Balance::new(totals.total_commission, total_withdrawn),
        })
    }
}
