pub mod earnings_controller;

pub use earnings_controller::{configure, configure_reviews};
