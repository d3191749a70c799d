//! Salon ledger library
//!
//! Commission pricing, the sale ledger, period reports and the employee
//! withdrawal ledger, exposed over actix-web.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;
pub mod store;

pub use app::{AppState, Repositories, ServiceSettings};
pub use modules::{reports, sales, withdrawals};
