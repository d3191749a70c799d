pub mod error_handler;
pub mod identity;
pub mod request_id;

pub use error_handler::{configure_extractors, json_error_handler};
pub use identity::{Identity, Role};
pub use request_id::{RequestId, REQUEST_ID_HEADER};
