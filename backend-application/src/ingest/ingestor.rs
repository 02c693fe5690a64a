use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use backend_domain::{
    ContainerEnvelope, ContainerTransaction, DomainError, EventEnvelope, IngestBatch, LogEvent,
};

use crate::ingest::IngestionQueues;
use crate::Metrics;

const MAX_REPORTED_REJECTIONS: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub accepted: usize,
    pub dropped: usize,
    pub rejected: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl IngestSummary {
    fn record(&mut self, index: &str, result: Result<bool, DomainError>) {
        match result {
            Ok(true) => self.accepted += 1,
            Ok(false) => self.dropped += 1,
            Err(err) => {
                self.rejected += 1;
                if self.errors.len() < MAX_REPORTED_REJECTIONS {
                    self.errors.push(format!("{index}: {err}"));
                }
            }
        }
    }
}

#[derive(Clone)]
pub struct EventIngestor {
    queues: Arc<IngestionQueues>,
    metrics: Arc<Metrics>,
}

impl EventIngestor {
    pub fn new(queues: Arc<IngestionQueues>, metrics: Arc<Metrics>) -> Self {
        Self { queues, metrics }
    }

    /// Never blocks. `false` means the queue was full and the event is gone.
    pub fn enqueue_event(&self, event: LogEvent) -> bool {
        if self.queues.logs.enqueue(event) {
            self.metrics.record_enqueued_event();
            true
        } else {
            self.metrics.record_overflow_drop();
            false
        }
    }

    pub fn enqueue_container(&self, transaction: ContainerTransaction) -> bool {
        if self.queues.containers.enqueue(transaction) {
            self.metrics.record_enqueued_container();
            true
        } else {
            self.metrics.record_overflow_drop();
            false
        }
    }

    pub fn submit_event(&self, envelope: EventEnvelope) -> Result<bool, DomainError> {
        let event = LogEvent::try_from(envelope).inspect_err(|_| self.metrics.record_rejected())?;
        Ok(self.enqueue_event(event))
    }

    pub fn submit_container(&self, envelope: ContainerEnvelope) -> Result<bool, DomainError> {
        let transaction = ContainerTransaction::try_from(envelope)
            .inspect_err(|_| self.metrics.record_rejected())?;
        Ok(self.enqueue_container(transaction))
    }

    /// Validates and enqueues every entry; invalid entries are skipped.
    pub fn submit_batch(&self, batch: IngestBatch) -> IngestSummary {
        let mut summary = IngestSummary::default();
        for (i, envelope) in batch.events.into_iter().enumerate() {
            summary.record(&format!("events[{i}]"), self.submit_event(envelope));
        }
        for (i, envelope) in batch.containers.into_iter().enumerate() {
            summary.record(&format!("containers[{i}]"), self.submit_container(envelope));
        }
        debug!(
            accepted = summary.accepted,
            dropped = summary.dropped,
            rejected = summary.rejected,
            "ingest batch queued"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::{ActionKind, Location};

    fn ingestor(capacity: usize) -> (EventIngestor, Arc<IngestionQueues>, Arc<Metrics>) {
        let queues = Arc::new(IngestionQueues::new(capacity));
        let metrics = Arc::new(Metrics::default());
        (EventIngestor::new(queues.clone(), metrics.clone()), queues, metrics)
    }

    #[test]
    fn batch_reports_accepted_dropped_and_rejected() {
        let (ingestor, queues, metrics) = ingestor(2);
        let batch = IngestBatch {
            events: vec![
                EventEnvelope::new(ActionKind::Login, "Alice")
                    .with_location(Location::new("world", 10, 64, -5)),
                EventEnvelope::new(ActionKind::Chat, " "),
                EventEnvelope::new(ActionKind::Logout, "Alice"),
                EventEnvelope::new(ActionKind::Login, "Bob"),
            ],
            containers: Vec::new(),
        };
        let summary = ingestor.submit_batch(batch);
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.dropped, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.errors, vec!["events[1]: player name is empty".to_string()]);
        assert_eq!(queues.logs.len(), 2);
        assert_eq!(metrics.overflow_drops(), 1);
    }

    #[test]
    fn container_envelope_is_routed_to_its_own_queue() {
        let (ingestor, queues, _) = ingestor(10);
        let envelope = ContainerEnvelope {
            player: "Ann".into(),
            action: 1,
            container_type: "CHEST".into(),
            material: "DIAMOND".into(),
            amount: 3,
            world: "world".into(),
            x: 1,
            y: 2,
            z: 3,
            time: None,
        };
        assert_eq!(ingestor.submit_container(envelope), Ok(true));
        assert_eq!(queues.containers.len(), 1);
        assert_eq!(queues.logs.len(), 0);
    }
}
