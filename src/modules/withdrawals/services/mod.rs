pub mod earnings_service;

pub use earnings_service::EarningsService;
