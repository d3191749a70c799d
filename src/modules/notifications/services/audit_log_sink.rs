use async_trait::async_trait;

use crate::core::Result;
use crate::modules::notifications::models::EventEnvelope;
use crate::modules::notifications::services::EventSink;

/// Writes every event as one structured line on the `audit` target
#[derive(Debug, Default, Clone, Copy)]
pub struct AuditLogSink;

#[async_trait]
impl EventSink for AuditLogSink {
    fn name(&self) -> &'static str {
        "audit_log"
    }

    async fn deliver(&self, envelope: &EventEnvelope) -> Result<()> {
        let payload = serde_json::to_string(&envelope.event)?;
        tracing::info!(
            target: "audit",
            event_id = %envelope.id,
            event = envelope.event.name(),
            occurred_at = %envelope.occurred_at.to_rfc3339(),
            payload = %payload,
            "domain event"
        );
        Ok(())
    }
}
