pub mod service_type;

pub use service_type::{
    CatalogQuery, NewServiceTypeRequest, ServiceType, ServiceTypePatch, DEFAULT_DURATION_MINUTES,
};
