use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::identity::Identity;
use crate::modules::employees::models::{EmployeePatch, EmployeeQuery, NewEmployeeRequest};
use crate::modules::employees::services::EmployeeService;

/// POST /employees
pub async fn create_employee(
    service: web::Data<Arc<EmployeeService>>,
    identity: Identity,
    request: web::Json<NewEmployeeRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let employee = service
        .create_employee(request.into_inner(), &identity.user_id)
        .await?;

    Ok(HttpResponse::Created().json(employee))
}

/// GET /employees?include_inactive=
pub async fn list_employees(
    service: web::Data<Arc<EmployeeService>>,
    identity: Identity,
    query: web::Query<EmployeeQuery>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let employees = service.list_employees(query.include_inactive).await?;
    Ok(HttpResponse::Ok().json(employees))
}

/// GET /employees/{id}
pub async fn get_employee(
    service: web::Data<Arc<EmployeeService>>,
    identity: Identity,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let employee = service.get_employee(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// PUT /employees/{id}
pub async fn update_employee(
    service: web::Data<Arc<EmployeeService>>,
    identity: Identity,
    path: web::Path<String>,
    patch: web::Json<EmployeePatch>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let employee = service
        .update_employee(&path.into_inner(), patch.into_inner(), &identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Soft delete
/// DELETE /employees/{id}
pub async fn deactivate_employee(
    service: web::Data<Arc<EmployeeService>>,
    identity: Identity,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let employee = service
        .deactivate_employee(&path.into_inner(), &identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Employee management routes, relative to the `/employees` scope
///
/// `/{id}` captures any single segment, so these go after the earnings routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create_employee))
        .route("", web::get().to(list_employees))
        .route("/{id}", web::get().to(get_employee))
        .route("/{id}", web::put().to(update_employee))
        .route("/{id}", web::delete().to(deactivate_employee));
}
