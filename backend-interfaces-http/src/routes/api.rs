use axum::routing::{get, post};
use axum::Router;

use backend_application::AppState;

use crate::handlers::{ingest_handlers, ops_handlers, query_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/logs", get(query_handlers::list_logs))
        .route("/players", get(query_handlers::list_players))
        .route("/actions", get(query_handlers::list_actions))
        .route("/stats/actions", get(query_handlers::action_stats))
        .route("/containers", get(query_handlers::list_containers))
        .route("/ingest/events", post(ingest_handlers::ingest_events))
        .route("/ops/stats", get(ops_handlers::queue_stats))
        .route("/ops/flush", post(ops_handlers::flush))
        .route("/ops/pool", get(ops_handlers::pool_stats))
        .route("/ops/health/live", get(ops_handlers::health_live))
        .route("/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
