pub mod audit_log_sink;
pub mod event_publisher;
pub mod webhook_sink;

pub use audit_log_sink::AuditLogSink;
pub use event_publisher::{EventPublisher, EventSink};
pub use webhook_sink::WebhookSink;
