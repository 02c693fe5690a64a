use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use backend_domain::ports::LogRepository;

use crate::ingest::IngestionQueues;
use crate::Metrics;

/// Result of one flush cycle for a single queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleOutcome {
    Idle,
    Committed { rows: usize },
    Dropped { rows: usize, error: String },
}

impl CycleOutcome {
    pub fn committed_rows(&self) -> usize {
        match self {
            CycleOutcome::Committed { rows } => *rows,
            _ => 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, CycleOutcome::Idle)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CycleOutcome::Dropped { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    pub logs: CycleOutcome,
    pub containers: CycleOutcome,
}

impl FlushReport {
    pub fn persisted(&self) -> usize {
        self.logs.committed_rows() + self.containers.committed_rows()
    }
}

/// Sole consumer of the ingestion queues. Each cycle does one transactional
/// insert per non-empty queue.
pub struct BatchWriter {
    queues: Arc<IngestionQueues>,
    repo: Arc<dyn LogRepository>,
    metrics: Arc<Metrics>,
    batch_size: usize,
    // Serializes manual flushes with the scheduled ones.
    cycle: Mutex<()>,
}

impl BatchWriter {
    pub fn new(
        queues: Arc<IngestionQueues>,
        repo: Arc<dyn LogRepository>,
        metrics: Arc<Metrics>,
        batch_size: usize,
    ) -> Self {
        Self {
            queues,
            repo,
            metrics,
            batch_size: batch_size.max(1),
            cycle: Mutex::new(()),
        }
    }

    /// Runs one drain-then-persist cycle for each queue. A failed batch is
    /// logged and discarded; it is neither retried nor re-queued.
    pub async fn flush(&self) -> FlushReport {
        let _guard = self.cycle.lock().await;

        let dropped = self.metrics.take_unreported_drops();
        if dropped > 0 {
            warn!(dropped, "ingestion queue full, events discarded since last flush");
        }

        let logs = {
            let batch = self.queues.logs.drain(self.batch_size).await;
            if batch.is_empty() {
                CycleOutcome::Idle
            } else {
                let rows = batch.len();
                self.settle("logs", rows, self.repo.insert_logs(&batch).await)
            }
        };
        let containers = {
            let batch = self.queues.containers.drain(self.batch_size).await;
            if batch.is_empty() {
                CycleOutcome::Idle
            } else {
                let rows = batch.len();
                self.settle(
                    "container_transactions",
                    rows,
                    self.repo.insert_container_transactions(&batch).await,
                )
            }
        };

        FlushReport { logs, containers }
    }

    /// Flushes until both queues are empty or a batch fails.
    pub async fn flush_all(&self) -> FlushReport {
        let mut total = FlushReport {
            logs: CycleOutcome::Idle,
            containers: CycleOutcome::Idle,
        };
        loop {
            let report = self.flush().await;
            let done = report.logs.is_idle() && report.containers.is_idle();
            let failed = report.logs.is_failure() || report.containers.is_failure();
            total.logs = merge(total.logs, report.logs);
            total.containers = merge(total.containers, report.containers);
            if done || failed {
                return total;
            }
        }
    }

    fn settle(&self, table: &str, rows: usize, result: anyhow::Result<u64>) -> CycleOutcome {
        match result {
            Ok(written) => {
                self.metrics.record_persisted(written);
                debug!(table, batch = rows, "batch committed");
                CycleOutcome::Committed { rows }
            }
            Err(err) => {
                self.metrics.record_failed_batch(rows);
                error!(table, batch = rows, error = %err, "batch insert failed, batch dropped");
                CycleOutcome::Dropped {
                    rows,
                    error: err.to_string(),
                }
            }
        }
    }

    /// Starts the periodic flush task.
    pub fn spawn(self: Arc<Self>, period: Duration) -> WriterHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let writer = Arc::clone(&self);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    changed = stop_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
                if *stop_rx.borrow() {
                    break;
                }
                writer.flush().await;
            }
            debug!("batch writer ticker stopped");
        });
        info!(period_ms = period.as_millis() as u64, "batch writer started");
        WriterHandle {
            writer: self,
            stop_tx,
            task: Mutex::new(Some(task)),
        }
    }
}

fn merge(acc: CycleOutcome, next: CycleOutcome) -> CycleOutcome {
    match (acc, next) {
        (acc, CycleOutcome::Idle) => acc,
        (CycleOutcome::Idle, next) => next,
        (CycleOutcome::Committed { rows: a }, CycleOutcome::Committed { rows: b }) => {
            CycleOutcome::Committed { rows: a + b }
        }
        (_, dropped) => dropped,
    }
}

/// Owner of the running ticker.
pub struct WriterHandle {
    writer: Arc<BatchWriter>,
    stop_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl WriterHandle {
    pub fn writer(&self) -> &Arc<BatchWriter> {
        &self.writer
    }

    /// Stops the schedule, waits for an in-flight cycle, then drains what is
    /// left. Later calls only flush.
    pub async fn shutdown(&self) -> FlushReport {
        let _ = self.stop_tx.send(true);
        if let Some(task) = self.task.lock().await.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "batch writer task ended abnormally");
            }
        }
        let report = self.writer.flush_all().await;
        info!(persisted = report.persisted(), "final flush complete");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeRepository;
    use backend_domain::{ActionKind, LogEvent};

    fn writer_with(
        repo: Arc<FakeRepository>,
        capacity: usize,
        batch: usize,
    ) -> (Arc<BatchWriter>, Arc<IngestionQueues>, Arc<Metrics>) {
        let queues = Arc::new(IngestionQueues::new(capacity));
        let metrics = Arc::new(Metrics::default());
        let writer = Arc::new(BatchWriter::new(queues.clone(), repo, metrics.clone(), batch));
        (writer, queues, metrics)
    }

    fn event(player: &str) -> LogEvent {
        LogEvent::new(player, ActionKind::Login, "", None).unwrap()
    }

    #[tokio::test]
    async fn committed_cycle_persists_exactly_the_drained_count() {
        let repo = Arc::new(FakeRepository::default());
        let (writer, queues, metrics) = writer_with(repo.clone(), 100, 500);
        for _ in 0..7 {
            queues.logs.enqueue(event("Bob"));
        }
        let report = writer.flush().await;
        assert_eq!(report.logs, CycleOutcome::Committed { rows: 7 });
        assert_eq!(report.containers, CycleOutcome::Idle);
        assert_eq!(repo.log_count(), 7);
        assert_eq!(metrics.persisted_rows(), 7);
        assert!(queues.logs.is_empty());
    }

    #[tokio::test]
    async fn cycle_drains_at_most_one_batch() {
        let repo = Arc::new(FakeRepository::default());
        let (writer, queues, _) = writer_with(repo.clone(), 100, 4);
        for _ in 0..10 {
            queues.logs.enqueue(event("Bob"));
        }
        writer.flush().await;
        assert_eq!(repo.log_count(), 4);
        assert_eq!(queues.logs.len(), 6);
        let report = writer.flush_all().await;
        assert_eq!(report.logs.committed_rows(), 6);
        assert_eq!(repo.log_count(), 10);
    }

    #[tokio::test]
    async fn failed_cycle_drops_the_batch_without_retry() {
        let repo = Arc::new(FakeRepository::default());
        repo.fail_writes(true);
        let (writer, queues, metrics) = writer_with(repo.clone(), 100, 500);
        for _ in 0..3 {
            queues.logs.enqueue(event("Bob"));
        }
        let report = writer.flush().await;
        assert!(report.logs.is_failure());
        assert_eq!(repo.log_count(), 0);
        assert!(queues.logs.is_empty());
        assert_eq!(metrics.failed_batches(), 1);

        repo.fail_writes(false);
        let report = writer.flush().await;
        assert!(report.logs.is_idle());
        assert_eq!(repo.log_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_flushes_periodically_and_shutdown_drains() {
        let repo = Arc::new(FakeRepository::default());
        let (writer, queues, _) = writer_with(repo.clone(), 100, 500);
        let handle = writer.spawn(Duration::from_secs(1));

        queues.logs.enqueue(event("Alice"));
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(repo.log_count(), 1);

        queues.logs.enqueue(event("Alice"));
        let report = handle.shutdown().await;
        assert_eq!(report.logs.committed_rows(), 1);
        assert_eq!(repo.log_count(), 2);

        queues.logs.enqueue(event("Late"));
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(repo.log_count(), 2);
    }
}
