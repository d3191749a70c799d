pub mod pricing_guard;
pub mod sale_service;

pub use pricing_guard::{PricedSale, PricingGuard};
pub use sale_service::SaleService;
