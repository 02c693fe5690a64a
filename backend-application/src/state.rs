use std::sync::Arc;

use backend_domain::ports::{LogRepository, StoragePool};
use backend_domain::RuntimeConfig;

use crate::ingest::{BatchWriter, EventIngestor, IngestionQueues};
use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub log_repo: Arc<dyn LogRepository>,
    pub pool: Arc<dyn StoragePool>,
    pub queues: Arc<IngestionQueues>,
    pub writer: Arc<BatchWriter>,
    pub ingestor: EventIngestor,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Wires the queues, writer and ingestor around one repository.
    pub fn new(
        config: RuntimeConfig,
        log_repo: Arc<dyn LogRepository>,
        pool: Arc<dyn StoragePool>,
    ) -> Self {
        let metrics = Arc::new(Metrics::default());
        let queues = Arc::new(IngestionQueues::new(config.queue_capacity));
        let writer = Arc::new(BatchWriter::new(
            queues.clone(),
            log_repo.clone(),
            metrics.clone(),
            config.batch_size,
        ));
        let ingestor = EventIngestor::new(queues.clone(), metrics.clone());
        Self {
            config,
            log_repo,
            pool,
            queues,
            writer,
            ingestor,
            metrics,
        }
    }
}
