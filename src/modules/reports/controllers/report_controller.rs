use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::core::Period;
use crate::middleware::identity::Identity;
use crate::modules::reports::services::ReportService;

/// `GET /reports/daily?date=YYYY-MM-DD`
#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub date: Option<NaiveDate>,
}

/// Named periods end on `end_date`, today when absent
#[derive(Debug, Deserialize)]
pub struct PeriodEndQuery {
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// GET /reports/dashboard
pub async fn dashboard(
    service: web::Data<Arc<ReportService>>,
    identity: Identity,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let summary = service.dashboard_summary().await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// GET /reports/daily
pub async fn daily_report(
    service: web::Data<Arc<ReportService>>,
    identity: Identity,
    query: web::Query<DailyQuery>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let report = service.daily_report(query.date).await?;
    Ok(HttpResponse::Ok().json(report))
}

async fn named_period(
    service: &ReportService,
    identity: Identity,
    period: Period,
    end_date: Option<NaiveDate>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let report = service.period_report(period, end_date).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /reports/weekly
pub async fn weekly_report(
    service: web::Data<Arc<ReportService>>,
    identity: Identity,
    query: web::Query<PeriodEndQuery>,
) -> Result<HttpResponse, AppError> {
    named_period(&service, identity, Period::Weekly, query.end_date).await
}

/// GET /reports/biweekly
pub async fn biweekly_report(
    service: web::Data<Arc<ReportService>>,
    identity: Identity,
    query: web::Query<PeriodEndQuery>,
) -> Result<HttpResponse, AppError> {
    named_period(&service, identity, Period::Biweekly, query.end_date).await
}

/// GET /reports/monthly
pub async fn monthly_report(
    service: web::Data<Arc<ReportService>>,
    identity: Identity,
    query: web::Query<PeriodEndQuery>,
) -> Result<HttpResponse, AppError> {
    named_period(&service, identity, Period::Monthly, query.end_date).await
}

/// Arbitrary whole-day range; both dates are required
/// GET /reports/custom?start_date=&end_date=
pub async fn custom_report(
    service: web::Data<Arc<ReportService>>,
    identity: Identity,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let (start_date, end_date) = match (query.start_date, query.end_date) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(AppError::invalid_input(
                "start_date and end_date are required",
            ))
        }
    };

    let report = service.custom_report(start_date, end_date).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /reports/employees/comparison
pub async fn employee_comparison(
    service: web::Data<Arc<ReportService>>,
    identity: Identity,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let comparison = service
        .employee_comparison(query.start_date, query.end_date)
        .await?;
    Ok(HttpResponse::Ok().json(comparison))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/dashboard", web::get().to(dashboard))
            .route("/daily", web::get().to(daily_report))
            .route("/weekly", web::get().to(weekly_report))
            .route("/biweekly", web::get().to(biweekly_report))
            .route("/monthly", web::get().to(monthly_report))
            .route("/custom", web::get().to(custom_report))
            .route("/employees/comparison", web::get().to(employee_comparison)),
    );
}
