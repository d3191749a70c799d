pub mod service_type_repository;

pub use service_type_repository::{MySqlServiceTypeRepository, ServiceTypeRepository};
