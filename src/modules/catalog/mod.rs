// Service-type catalog

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{NewServiceTypeRequest, ServiceType, ServiceTypePatch};
pub use repositories::{MySqlServiceTypeRepository, ServiceTypeRepository};
pub use services::CatalogService;
