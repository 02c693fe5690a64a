use tracing::info;

use crate::ingest::FlushReport;
use crate::AppState;

/// Out-of-band flush cycle; waits for any scheduled cycle in progress.
pub async fn flush_now(state: &AppState) -> FlushReport {
    let report = state.writer.flush().await;
    info!(persisted = report.persisted(), "manual flush finished");
    report
}
