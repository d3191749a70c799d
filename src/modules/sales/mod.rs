// Sales (service records) module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{BilledItem, NewSaleRequest, Sale, SaleFilters, SaleOrder, SalePatch};
pub use repositories::{MySqlSaleRepository, SaleRepository};
pub use services::{PricedSale, PricingGuard, SaleService};
