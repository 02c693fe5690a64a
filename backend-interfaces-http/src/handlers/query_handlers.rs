use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

use backend_application::queries::{container_queries, log_queries};
use backend_application::AppState;
use backend_domain::{
    ActionKind, ActionSummary, ContainerFilter, LogFilter, SortOrder, TransferDirection,
};

use crate::dto::{
    parse_number, parse_time_bound, ContainersQuery, ContainersResponse, LogsQuery, LogsResponse,
};
use crate::error::HttpError;
use crate::middleware::authorize;

fn sort_order(value: Option<&str>) -> SortOrder {
    value.map(SortOrder::parse).unwrap_or_default()
}

fn log_filter(query: &LogsQuery) -> Result<LogFilter, HttpError> {
    let from = parse_time_bound(query.from.as_deref(), false).map_err(HttpError::BadRequest)?;
    let to = parse_time_bound(query.to.as_deref(), true).map_err(HttpError::BadRequest)?;
    let action = query
        .action
        .as_deref()
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(ActionKind::from_label);
    Ok(LogFilter {
        player: query.player.clone(),
        action,
        detail_contains: query.item_container.clone(),
        from,
        to,
    }
    .normalized())
}

pub async fn list_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LogsQuery>,
) -> Result<Json<LogsResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let filter = log_filter(&query)?;
    let page = log_queries::page_request(
        &state.config,
        parse_number(query.page.as_deref()),
        parse_number(query.size.as_deref()),
        sort_order(query.sort.as_deref()),
    );
    let result = log_queries::fetch_log_page(&state, filter, page).await;
    Ok(Json(LogsResponse::from(result)))
}

pub async fn list_players(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<String>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(log_queries::list_distinct_players(&state).await))
}

pub async fn list_actions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<String>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(log_queries::list_distinct_actions(&state).await))
}

pub async fn action_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LogsQuery>,
) -> Result<Json<ActionSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let filter = log_filter(&query)?;
    let last = parse_number(query.last.as_deref());
    Ok(Json(log_queries::action_summary(&state, filter, last).await))
}

pub async fn list_containers(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ContainersQuery>,
) -> Result<Json<ContainersResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let direction = match query.direction.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            TransferDirection::parse(raw)
                .ok_or_else(|| HttpError::BadRequest(format!("unknown direction '{raw}'")))?,
        ),
    };
    let filter = ContainerFilter {
        player: query.player.clone(),
        material_contains: query.material.clone(),
        direction,
    };
    let page = log_queries::page_request(
        &state.config,
        parse_number(query.page.as_deref()),
        parse_number(query.size.as_deref()),
        sort_order(query.sort.as_deref()),
    );
    let result = container_queries::fetch_container_page(&state, filter, page).await;
    Ok(Json(ContainersResponse::from(result)))
}
