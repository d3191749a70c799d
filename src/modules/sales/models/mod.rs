pub mod sale;

pub use sale::{BilledItem, NewSaleRequest, Sale, SaleFilters, SaleOrder, SalePatch, SaleQuery};
