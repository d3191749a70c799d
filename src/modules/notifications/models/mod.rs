pub mod domain_event;

pub use domain_event::{DomainEvent, EventEnvelope};
