use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::identity::Identity;
use crate::modules::sales::models::{NewSaleRequest, SalePatch, SaleQuery};
use crate::modules::sales::services::SaleService;

/// Record a sale
/// POST /services
pub async fn create_sale(
    service: web::Data<Arc<SaleService>>,
    identity: Identity,
    request: web::Json<NewSaleRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let sale = service
        .price_sale(request.into_inner(), &identity.user_id)
        .await?;

    Ok(HttpResponse::Created().json(sale))
}

/// List sales, newest first
/// GET /services?employee_id=&client_name=&start_date=&end_date=&limit=
pub async fn list_sales(
    service: web::Data<Arc<SaleService>>,
    identity: Identity,
    query: web::Query<SaleQuery>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let filters = service.filters_from_query(query.into_inner())?;
    let sales = service.list_sales(&filters).await?;

    Ok(HttpResponse::Ok().json(sales))
}

/// GET /services/{id}
pub async fn get_sale(
    service: web::Data<Arc<SaleService>>,
    identity: Identity,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let sale = service.get_sale(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(sale))
}

/// Admin correction
/// PUT /services/{id}
pub async fn correct_sale(
    service: web::Data<Arc<SaleService>>,
    identity: Identity,
    path: web::Path<String>,
    patch: web::Json<SalePatch>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let sale = service
        .correct_sale(&path.into_inner(), patch.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(sale))
}

/// DELETE /services/{id}
pub async fn delete_sale(
    service: web::Data<Arc<SaleService>>,
    identity: Identity,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    service.delete_sale(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Sale routes, relative to the `/services` scope
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create_sale))
        .route("", web::get().to(list_sales))
        .route("/{id}", web::get().to(get_sale))
        .route("/{id}", web::put().to(correct_sale))
        .route("/{id}", web::delete().to(delete_sale));
}
