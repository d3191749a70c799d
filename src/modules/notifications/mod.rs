// Domain event fan-out to audit log and finance webhook

pub mod models;
pub mod services;

pub use models::{DomainEvent, EventEnvelope};
pub use services::{AuditLogSink, EventPublisher, EventSink, WebhookSink};
