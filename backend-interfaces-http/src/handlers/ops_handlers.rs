use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tokio::time::Duration;

use backend_application::commands::ops_commands;
use backend_application::queries::ops_queries;
use backend_application::{AppState, FlushReport};

use crate::error::HttpError;
use crate::middleware::authorize;

#[derive(Serialize)]
pub struct QueueStatsBody {
    log_queue: usize,
    container_queue: usize,
    capacity: usize,
    summary: String,
}

#[derive(Serialize)]
pub struct PoolStatsBody {
    active: u32,
    idle: u32,
    total: u32,
    waiting: u32,
    summary: String,
}

pub async fn queue_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<QueueStatsBody>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let stats = ops_queries::queue_stats(&state);
    Ok(Json(QueueStatsBody {
        log_queue: stats.log_queue,
        container_queue: stats.container_queue,
        capacity: stats.capacity,
        summary: stats.to_string(),
    }))
}

pub async fn flush(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<FlushReport>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(ops_commands::flush_now(&state).await))
}

pub async fn pool_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PoolStatsBody>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let stats = ops_queries::pool_stats(&state);
    Ok(Json(PoolStatsBody {
        active: stats.active,
        idle: stats.idle,
        total: stats.total,
        waiting: stats.waiting,
        summary: stats.to_string(),
    }))
}

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>) -> StatusCode {
    let limit = Duration::from_secs(state.config.request_timeout_seconds.max(1));
    if ops_queries::check_ready(&state, limit).await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

pub async fn metrics_prometheus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorize(&state.config, &headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized".to_string()).into_response();
    }
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload).into_response()
}
