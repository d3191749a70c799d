use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::identity::Identity;
use crate::modules::catalog::models::{CatalogQuery, NewServiceTypeRequest, ServiceTypePatch};
use crate::modules::catalog::services::CatalogService;

/// Active service types for the booking front end; no identity required
/// GET /services/types/public
pub async fn public_service_types(
    service: web::Data<Arc<CatalogService>>,
) -> Result<HttpResponse, AppError> {
    let service_types = service.list_service_types(false).await?;
    Ok(HttpResponse::Ok().json(service_types))
}

/// GET /services/types?include_inactive=
pub async fn list_service_types(
    service: web::Data<Arc<CatalogService>>,
    identity: Identity,
    query: web::Query<CatalogQuery>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let service_types = service.list_service_types(query.include_inactive).await?;
    Ok(HttpResponse::Ok().json(service_types))
}

/// GET /services/types/all
pub async fn all_service_types(
    service: web::Data<Arc<CatalogService>>,
    identity: Identity,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let service_types = service.list_service_types(true).await?;
    Ok(HttpResponse::Ok().json(service_types))
}

/// POST /services/types
pub async fn create_service_type(
    service: web::Data<Arc<CatalogService>>,
    identity: Identity,
    request: web::Json<NewServiceTypeRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let service_type = service
        .create_service_type(request.into_inner(), &identity.user_id)
        .await?;

    Ok(HttpResponse::Created().json(service_type))
}

/// GET /services/types/{id}
pub async fn get_service_type(
    service: web::Data<Arc<CatalogService>>,
    identity: Identity,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let service_type = service.get_service_type(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(service_type))
}

/// PUT /services/types/{id}
pub async fn update_service_type(
    service: web::Data<Arc<CatalogService>>,
    identity: Identity,
    path: web::Path<String>,
    patch: web::Json<ServiceTypePatch>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let service_type = service
        .update_service_type(&path.into_inner(), patch.into_inner(), &identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(service_type))
}

/// Soft delete
/// DELETE /services/types/{id}
pub async fn deactivate_service_type(
    service: web::Data<Arc<CatalogService>>,
    identity: Identity,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;

    let service_type = service
        .deactivate_service_type(&path.into_inner(), &identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(service_type))
}

/// Catalog routes, relative to the `/services` scope
///
/// Registered ahead of the sale routes so `/types` is never taken for a sale id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/types/public", web::get().to(public_service_types))
        .route("/types/all", web::get().to(all_service_types))
        .route("/types", web::post().to(create_service_type))
        .route("/types", web::get().to(list_service_types))
        .route("/types/{id}", web::get().to(get_service_type))
        .route("/types/{id}", web::put().to(update_service_type))
        .route("/types/{id}", web::delete().to(deactivate_service_type));
}
