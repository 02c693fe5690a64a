use tracing::warn;

use backend_domain::IngestBatch;

use crate::ingest::IngestSummary;
use crate::{AppError, AppState};

pub fn process_ingest_batch(state: &AppState, batch: IngestBatch) -> Result<IngestSummary, AppError> {
    state.metrics.record_ingest_request();
    if batch.is_empty() {
        return Err(AppError::BadRequest("batch contains no events".to_string()));
    }
    let summary = state.ingestor.submit_batch(batch);
    if summary.rejected > 0 {
        warn!(rejected = summary.rejected, "ingest batch contained invalid entries");
    }
    Ok(summary)
}
