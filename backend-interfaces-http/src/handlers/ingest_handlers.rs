use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use tracing::error;

use backend_application::commands::ingest_commands;
use backend_application::ingest::IngestSummary;
use backend_application::AppState;

use crate::error::HttpError;
use crate::middleware::{authorize, parse_ingest_batch};

pub async fn ingest_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<IngestSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }

    let batch = parse_ingest_batch(&headers, &body).map_err(|err| {
        error!("failed to parse ingest body: {}", err);
        HttpError::BadRequest(err.to_string())
    })?;
    let summary = ingest_commands::process_ingest_batch(&state, batch)?;
    Ok(Json(summary))
}
