use std::sync::Arc;

use rust_decimal::Decimal;

use crate::core::{money, AppError, Clock, Result};
use crate::modules::catalog::models::{
    NewServiceTypeRequest, ServiceType, ServiceTypePatch, DEFAULT_DURATION_MINUTES,
};
use crate::modules::catalog::repositories::ServiceTypeRepository;

const MIN_NAME_LEN: usize = 2;

/// Admin management of the service-type catalog
///
/// Sales may reference a service type, so removal only clears `is_active`.
pub struct CatalogService {
    service_types: Arc<dyn ServiceTypeRepository>,
    clock: Arc<dyn Clock>,
}

impl CatalogService {
    pub fn new(service_types: Arc<dyn ServiceTypeRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            service_types,
            clock,
        }
    }

    pub async fn create_service_type(
        &self,
        request: NewServiceTypeRequest,
        created_by: &str,
    ) -> Result<ServiceType> {
        let name = validate_name(&request.name)?;
        let default_price = validate_default_price(request.default_price)?;
        let duration_minutes =
            validate_duration(request.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES))?;

        let service_type = ServiceType {
            created_at: self.clock.now(),
            ..ServiceType::new(name, default_price, duration_minutes)
        };

        self.service_types.save(&service_type).await?;

        tracing::info!(
            service_type_id = %service_type.id,
            default_price = %service_type.default_price,
            created_by = %created_by,
            "Service type created"
        );

        Ok(service_type)
    }

    /// Ordered by name
    pub async fn list_service_types(&self, include_inactive: bool) -> Result<Vec<ServiceType>> {
        self.service_types.list_catalog(include_inactive).await
    }

    pub async fn get_service_type(&self, id: &str) -> Result<ServiceType> {
        self.service_types
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Service type {} not found", id)))
    }

    /// A new default price only caps sales recorded afterwards
    pub async fn update_service_type(
        &self,
        id: &str,
        patch: ServiceTypePatch,
        updated_by: &str,
    ) -> Result<ServiceType> {
        let mut service_type = self.get_service_type(id).await?;

        if let Some(name) = patch.name {
            service_type.name = validate_name(&name)?;
        }
        if let Some(default_price) = patch.default_price {
            service_type.default_price = validate_default_price(default_price)?;
        }
        if let Some(duration_minutes) = patch.duration_minutes {
            service_type.duration_minutes = validate_duration(duration_minutes)?;
        }
        if let Some(is_active) = patch.is_active {
            service_type.is_active = is_active;
        }

        self.service_types.save(&service_type).await?;

        tracing::info!(
            service_type_id = %service_type.id,
            default_price = %service_type.default_price,
            is_active = service_type.is_active,
            updated_by = %updated_by,
            "Service type updated"
        );

        Ok(service_type)
    }

    pub async fn deactivate_service_type(
        &self,
        id: &str,
        deactivated_by: &str,
    ) -> Result<ServiceType> {
        let mut service_type = self.get_service_type(id).await?;
        if !service_type.is_active {
            return Ok(service_type);
        }

        service_type.is_active = false;
        self.service_types.save(&service_type).await?;

        tracing::info!(
            service_type_id = %service_type.id,
            deactivated_by = %deactivated_by,
            "Service type deactivated"
        );

        Ok(service_type)
    }
}

fn validate_name(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.chars().count() < MIN_NAME_LEN {
        return Err(AppError::invalid_input(format!(
            "Service type name must have at least {} characters",
            MIN_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_default_price(price: Decimal) -> Result<Decimal> {
    if money::exceeds_max(price) {
        return Err(AppError::invalid_input(format!(
            "Default price cannot exceed {}, got {}",
            money::MAX_AMOUNT,
            price
        )));
    }
    let price = money::round2(price);
    if price <= Decimal::ZERO {
        return Err(AppError::invalid_input(format!(
            "Default price must be greater than 0, got {}",
            price
        )));
    }
    Ok(price)
}

fn validate_duration(minutes: i32) -> Result<i32> {
    if minutes <= 0 {
        return Err(AppError::invalid_input(format!(
            "Duration must be a positive number of minutes, got {}",
            minutes
        )));
    }
    Ok(minutes)
}
