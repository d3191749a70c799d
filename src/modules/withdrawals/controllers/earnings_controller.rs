use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::core::Period;
use crate::middleware::identity::Identity;
use crate::modules::reports::services::ReportService;
use crate::modules::sales::models::SaleQuery;
use crate::modules::sales::services::SaleService;
use crate::modules::withdrawals::models::{ReviewWithdrawalRequest, WithdrawalRequest};
use crate::modules::withdrawals::services::EarningsService;

const DEFAULT_MY_SERVICES_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<Period>,
}

/// Either a named trailing period or an explicit day range
#[derive(Debug, Deserialize)]
pub struct EarningsQuery {
    pub period: Option<Period>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct MyServicesQuery {
    pub client_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// GET /employees/me/earnings?period=
pub async fn my_earnings(
    service: web::Data<Arc<EarningsService>>,
    identity: Identity,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let employee_id = identity.require_employee()?;

    let window = query.period.map(|period| service.period_window(period));
    let earnings = service.employee_balance(employee_id, window).await?;

    Ok(HttpResponse::Ok().json(earnings))
}

/// The caller's own sales, newest first
/// GET /employees/me/services
pub async fn my_services(
    sales: web::Data<Arc<SaleService>>,
    identity: Identity,
    query: web::Query<MyServicesQuery>,
) -> Result<HttpResponse, AppError> {
    let employee_id = identity.require_employee()?;
    let query = query.into_inner();

    let filters = sales.filters_from_query(SaleQuery {
        employee_id: Some(employee_id.to_string()),
        client_name: query.client_name,
        start_date: query.start_date,
        end_date: query.end_date,
        limit: Some(query.limit.unwrap_or(DEFAULT_MY_SERVICES_LIMIT)),
    })?;
    let list = sales.list_sales(&filters).await?;

    Ok(HttpResponse::Ok().json(list))
}

/// GET /employees/me/report?period=
pub async fn my_report(
    reports: web::Data<Arc<ReportService>>,
    identity: Identity,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let employee_id = identity.require_employee()?;

    let report = reports
        .employee_report(employee_id, query.period.unwrap_or(Period::Weekly))
        .await?;

    Ok(HttpResponse::Ok().json(report))
}

/// POST /employees/me/withdraw
pub async fn request_withdrawal(
    service: web::Data<Arc<EarningsService>>,
    identity: Identity,
    request: web::Json<WithdrawalRequest>,
) -> Result<HttpResponse, AppError> {
    let employee_id = identity.require_employee()?;

    let receipt = service
        .request_withdrawal(employee_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(receipt))
}

/// GET /employees/me/withdrawals
pub async fn my_withdrawals(
    service: web::Data<Arc<EarningsService>>,
    identity: Identity,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse, AppError> {
    let employee_id = identity.require_employee()?;

    let withdrawals = service.list_withdrawals(employee_id, query.limit).await?;
    Ok(HttpResponse::Ok().json(withdrawals))
}

/// Earnings of every active employee
/// GET /employees/earnings?period=
pub async fn all_earnings(
    service: web::Data<Arc<EarningsService>>,
    identity: Identity,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let earnings = service
        .all_employees_earnings(query.period.unwrap_or_default())
        .await?;
    Ok(HttpResponse::Ok().json(earnings))
}

/// GET /employees/{id}/earnings?period=|start_date=&end_date=
pub async fn employee_earnings(
    service: web::Data<Arc<EarningsService>>,
    identity: Identity,
    path: web::Path<String>,
    query: web::Query<EarningsQuery>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let window = match (query.start_date, query.end_date, query.period) {
        (Some(start), Some(end), None) => Some(service.date_window(start, end)?),
        (None, None, Some(period)) => Some(service.period_window(period)),
        (None, None, None) => None,
        _ => {
            return Err(AppError::invalid_input(
                "Pass either period or both start_date and end_date",
            ))
        }
    };

    let earnings = service
        .employee_balance(&path.into_inner(), window)
        .await?;
    Ok(HttpResponse::Ok().json(earnings))
}

/// Approve or reject a pending withdrawal
/// POST /withdrawals/{id}/review
pub async fn review_withdrawal(
    service: web::Data<Arc<EarningsService>>,
    identity: Identity,
    path: web::Path<String>,
    request: web::Json<ReviewWithdrawalRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let withdrawal = service
        .review_withdrawal(&path.into_inner(), request.into_inner(), &identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(withdrawal))
}

/// Earnings routes, relative to the `/employees` scope
///
/// The `/me` routes are registered ahead of `/{id}` so they are never
/// captured as an employee id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/me/earnings", web::get().to(my_earnings))
        .route("/me/services", web::get().to(my_services))
        .route("/me/report", web::get().to(my_report))
        .route("/me/withdraw", web::post().to(request_withdrawal))
        .route("/me/withdrawals", web::get().to(my_withdrawals))
        .route("/earnings", web::get().to(all_earnings))
        .route("/{id}/earnings", web::get().to(employee_earnings));
}

/// Review routes, relative to the `/withdrawals` scope
pub fn configure_reviews(cfg: &mut web::ServiceConfig) {
    cfg.route("/{id}/review", web::post().to(review_withdrawal));
}
