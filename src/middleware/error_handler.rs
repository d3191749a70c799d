use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, Error, HttpRequest,
};

use crate::core::AppError;

/// Malformed JSON bodies render the standard error body
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    tracing::debug!(error = %err, "Rejected JSON payload");
    AppError::invalid_input(format!("Invalid request body: {}", err)).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    AppError::invalid_input(format!("Invalid query string: {}", err)).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> Error {
    AppError::invalid_input(format!("Invalid path: {}", err)).into()
}

/// Register extractor configs so every rejection uses `AppError`
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));
}
