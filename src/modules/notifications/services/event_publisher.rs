use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;

use crate::core::{Clock, Result};
use crate::modules::notifications::models::{DomainEvent, EventEnvelope};

/// Destination for published domain events
#[async_trait]
pub trait EventSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn deliver(&self, envelope: &EventEnvelope) -> Result<()>;
}

/// Fans events out to every registered sink
///
/// Delivery failures are logged and swallowed: the write that produced the
/// event has already committed.
pub struct EventPublisher {
    sinks: Vec<Arc<dyn EventSink>>,
    clock: Arc<dyn Clock>,
}

impl EventPublisher {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sinks: Vec::new(),
            clock,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub async fn publish(&self, event: DomainEvent) {
        let envelope = EventEnvelope::new(event, self.clock.now());

        let deliveries = self.sinks.iter().map(|sink| {
            let envelope = &envelope;
            async move { (sink.name(), sink.deliver(envelope).await) }
        });

        for (sink, outcome) in join_all(deliveries).await {
            if let Err(e) = outcome {
                tracing::warn!(
                    sink = sink,
                    event = envelope.event.name(),
                    event_id = %envelope.id,
                    error = %e,
                    "Event delivery failed"
                );
            }
        }
    }
}
