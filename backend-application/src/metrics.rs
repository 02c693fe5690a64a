use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    ingest_requests: AtomicU64,
    enqueued_events: AtomicU64,
    enqueued_containers: AtomicU64,
    rejected_events: AtomicU64,
    overflow_drops: AtomicU64,
    unreported_drops: AtomicU64,
    persisted_rows: AtomicU64,
    failed_batches: AtomicU64,
    abandoned_rows: AtomicU64,
    query_errors: AtomicU64,
}

impl Metrics {
    pub fn record_ingest_request(&self) {
        self.ingest_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_enqueued_event(&self) {
        self.enqueued_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_enqueued_container(&self) {
        self.enqueued_containers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_overflow_drop(&self) {
        self.overflow_drops.fetch_add(1, Ordering::Relaxed);
        self.unreported_drops.fetch_add(1, Ordering::Relaxed);
    }

    /// Overflow drops since the previous call.
    pub fn take_unreported_drops(&self) -> u64 {
        self.unreported_drops.swap(0, Ordering::Relaxed)
    }

    pub fn record_persisted(&self, rows: u64) {
        self.persisted_rows.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn record_failed_batch(&self, rows: usize) {
        self.failed_batches.fetch_add(1, Ordering::Relaxed);
        self.abandoned_rows.fetch_add(rows as u64, Ordering::Relaxed);
    }

    pub fn record_query_error(&self) {
        self.query_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn overflow_drops(&self) -> u64 {
        self.overflow_drops.load(Ordering::Relaxed)
    }

    pub fn persisted_rows(&self) -> u64 {
        self.persisted_rows.load(Ordering::Relaxed)
    }

    pub fn failed_batches(&self) -> u64 {
        self.failed_batches.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let counters = [
            ("actionlog_ingest_requests_total", &self.ingest_requests),
            ("actionlog_enqueued_events_total", &self.enqueued_events),
            ("actionlog_enqueued_containers_total", &self.enqueued_containers),
            ("actionlog_rejected_events_total", &self.rejected_events),
            ("actionlog_overflow_drops_total", &self.overflow_drops),
            ("actionlog_persisted_rows_total", &self.persisted_rows),
            ("actionlog_failed_batches_total", &self.failed_batches),
            ("actionlog_abandoned_rows_total", &self.abandoned_rows),
            ("actionlog_query_errors_total", &self.query_errors),
        ];
        let mut out = String::new();
        for (name, counter) in counters {
            out.push_str(&format!(
                "# TYPE {name} counter\n{name} {}\n",
                counter.load(Ordering::Relaxed)
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreported_drops_reset_after_take() {
        let metrics = Metrics::default();
        metrics.record_overflow_drop();
        metrics.record_overflow_drop();
        assert_eq!(metrics.take_unreported_drops(), 2);
        assert_eq!(metrics.take_unreported_drops(), 0);
        assert_eq!(metrics.overflow_drops(), 2);
    }

    #[test]
    fn renders_counters() {
        let metrics = Metrics::default();
        metrics.record_persisted(7);
        let text = metrics.render_prometheus();
        assert!(text.contains("actionlog_persisted_rows_total 7\n"));
        assert!(text.contains("# TYPE actionlog_failed_batches_total counter\n"));
    }
}
