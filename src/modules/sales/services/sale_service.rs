use std::sync::Arc;

use rust_decimal::Decimal;

use crate::core::{money, AppError, Clock, ReportingCalendar, Result};
use crate::modules::catalog::repositories::ServiceTypeRepository;
use crate::modules::commissions::services::CommissionCalculator;
use crate::modules::employees::models::Employee;
use crate::modules::employees::repositories::EmployeeRepository;
use crate::modules::notifications::models::DomainEvent;
use crate::modules::notifications::services::EventPublisher;
use crate::modules::sales::models::{
    BilledItem, NewSaleRequest, Sale, SaleFilters, SaleOrder, SalePatch, SaleQuery,
};
use crate::modules::sales::repositories::SaleRepository;
use crate::modules::sales::services::PricingGuard;

/// Service for recording and correcting sales
pub struct SaleService {
    sales: Arc<dyn SaleRepository>,
    employees: Arc<dyn EmployeeRepository>,
    service_types: Arc<dyn ServiceTypeRepository>,
    calculator: CommissionCalculator,
    guard: PricingGuard,
    calendar: ReportingCalendar,
    clock: Arc<dyn Clock>,
    events: Arc<EventPublisher>,
}

impl SaleService {
    pub fn new(
        sales: Arc<dyn SaleRepository>,
        employees: Arc<dyn EmployeeRepository>,
        service_types: Arc<dyn ServiceTypeRepository>,
        calendar: ReportingCalendar,
        clock: Arc<dyn Clock>,
        events: Arc<EventPublisher>,
    ) -> Self {
        let calculator = CommissionCalculator::new();
        Self {
            sales,
            employees,
            service_types,
            calculator,
            guard: PricingGuard::new(calculator),
            calendar,
            clock,
            events,
        }
    }

    /// Price and record a new sale
    ///
    /// The employee's current commission rate is frozen onto the sale. A
    /// service-type reference that does not resolve is recorded as a custom
    /// service without a price ceiling.
    pub async fn price_sale(&self, request: NewSaleRequest, created_by: &str) -> Result<Sale> {
        let client_name = request.client_name.trim().to_string();
        if client_name.is_empty() {
            return Err(AppError::invalid_input("Client name is required"));
        }

        let employee = self.active_employee(&request.employee_id).await?;

        let service_type = match &request.service_type_id {
            Some(id) => {
                let found = self.service_types.find_by_id(id).await?;
                if found.is_none() {
                    tracing::warn!(
                        service_type_id = %id,
                        "Unknown service type on new sale, recording as custom"
                    );
                }
                found
            }
            None => None,
        };

        let priced = self
            .guard
            .price(request.price, service_type.as_ref(), employee.commission_rate)?;

        if priced.clamped {
            tracing::warn!(
                employee_id = %employee.id,
                requested_price = %priced.requested_price,
                final_price = %priced.final_price,
                created_by = %created_by,
                "Requested price exceeded catalog price, clamped"
            );
        }

        let now = self.clock.now();
        let sale = Sale {
            id: uuid::Uuid::new_v4().to_string(),
            employee_id: employee.id.clone(),
            billed_item: BilledItem::from_reference(service_type.map(|st| st.id)),
            client_name,
            client_phone: normalize(request.client_phone),
            price: priced.final_price,
            commission_rate: priced.commission_rate,
            commission_amount: priced.split.commission_amount,
            service_date: now,
            notes: normalize(request.notes),
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.sales.insert(&sale).await?;

        tracing::info!(
            sale_id = %sale.id,
            employee_id = %sale.employee_id,
            price = %sale.price,
            commission_amount = %sale.commission_amount,
            "Sale recorded"
        );

        self.events
            .publish(DomainEvent::SaleCreated {
                sale_id: sale.id.clone(),
                employee_id: sale.employee_id.clone(),
                price: sale.price,
                commission_amount: sale.commission_amount,
                clamped: priced.clamped,
                created_by: sale.created_by.clone(),
            })
            .await;

        Ok(sale)
    }

    pub async fn get_sale(&self, id: &str) -> Result<Sale> {
        self.sales
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Sale {} not found", id)))
    }

    pub async fn list_sales(&self, filters: &SaleFilters) -> Result<Vec<Sale>> {
        self.sales.list(filters).await
    }

    /// Translate calendar-day query bounds into store filters, newest first
    pub fn filters_from_query(&self, query: SaleQuery) -> Result<SaleFilters> {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            if start > end {
                return Err(AppError::invalid_input(
                    "start_date must be before or equal to end_date",
                ));
            }
        }

        Ok(SaleFilters {
            employee_id: query.employee_id,
            client_name: query.client_name.filter(|name| !name.trim().is_empty()),
            start: query.start_date.map(|date| self.calendar.start_of_day(date)),
            end: query.end_date.map(|date| self.calendar.end_of_day(date)),
            order: SaleOrder::MostRecentFirst,
            limit: query.limit,
        })
    }

    /// Apply an admin correction
    ///
    /// Commission is recomputed from scratch when the price or the employee
    /// changes: a new employee brings their current rate, a new price keeps
    /// the frozen rate.
    pub async fn correct_sale(&self, id: &str, patch: SalePatch) -> Result<Sale> {
        let mut sale = self.get_sale(id).await?;
        if patch.is_empty() {
            return Ok(sale);
        }

        let mut recompute = false;

        if let Some(employee_id) = patch.employee_id {
            if employee_id != sale.employee_id {
                let employee = self.active_employee(&employee_id).await?;
                sale.employee_id = employee.id;
                sale.commission_rate = employee.commission_rate;
                recompute = true;
            }
        }

        if let Some(price) = patch.price {
            if money::exceeds_max(price) {
                return Err(AppError::invalid_price(format!(
                    "Sale price cannot exceed {}, got {}",
                    money::MAX_AMOUNT,
                    price
                )));
            }
            let price = money::round2(price);
            if price <= Decimal::ZERO {
                return Err(AppError::invalid_price(format!(
                    "Sale price must be greater than 0, got {}",
                    price
                )));
            }
            if price != sale.price {
                sale.price = price;
                recompute = true;
            }
        }

        if let Some(service_type_id) = patch.service_type_id {
            sale.billed_item = match service_type_id {
                Some(id) => {
                    let service_type = self.service_types.find_by_id(&id).await?.ok_or_else(|| {
                        AppError::not_found(format!("Service type {} not found", id))
                    })?;
                    BilledItem::Catalog {
                        service_type_id: service_type.id,
                    }
                }
                None => BilledItem::Custom,
            };
        }

        if let Some(client_name) = patch.client_name {
            let client_name = client_name.trim().to_string();
            if client_name.is_empty() {
                return Err(AppError::invalid_input("Client name is required"));
            }
            sale.client_name = client_name;
        }

        if let Some(client_phone) = patch.client_phone {
            sale.client_phone = normalize(client_phone);
        }

        if let Some(notes) = patch.notes {
            sale.notes = normalize(notes);
        }

        if recompute {
            let split = self
                .calculator
                .calculate_commission(sale.price, sale.commission_rate)?;
            sale.commission_amount = split.commission_amount;
        }

        sale.updated_at = self.clock.now();
        self.sales.update(&sale).await?;

        tracing::info!(
            sale_id = %sale.id,
            employee_id = %sale.employee_id,
            price = %sale.price,
            commission_amount = %sale.commission_amount,
            commission_recomputed = recompute,
            "Sale corrected"
        );

        self.events
            .publish(DomainEvent::SaleCorrected {
                sale_id: sale.id.clone(),
                employee_id: sale.employee_id.clone(),
                price: sale.price,
                commission_amount: sale.commission_amount,
                commission_recomputed: recompute,
            })
            .await;

        Ok(sale)
    }

    /// Hard delete; the sale disappears from every later aggregate
    pub async fn delete_sale(&self, id: &str) -> Result<()> {
        let sale = self.get_sale(id).await?;

        if !self.sales.delete(id).await? {
            return Err(AppError::not_found(format!("Sale {} not found", id)));
        }

        tracing::info!(sale_id = %id, employee_id = %sale.employee_id, "Sale deleted");

        self.events
            .publish(DomainEvent::SaleDeleted {
                sale_id: sale.id,
                employee_id: sale.employee_id,
            })
            .await;

        Ok(())
    }

    async fn active_employee(&self, employee_id: &str) -> Result<Employee> {
        let employee = self
            .employees
            .find_by_id(employee_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Employee {} not found", employee_id)))?;

        if !employee.is_active {
            return Err(AppError::invalid_input(format!(
                "Employee {} is inactive and cannot receive new sales",
                employee_id
            )));
        }

        Ok(employee)
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
