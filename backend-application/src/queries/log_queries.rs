use tracing::error;

use backend_domain::{
    now_epoch_seconds, ActionCount, ActionKind, ActionSummary, LogEntry, LogFilter, LogPage,
    PageRequest, RuntimeConfig, SortOrder,
};

use crate::AppState;

const READ_FAILED: &str = "failed to load logs";

const DEFAULT_SUMMARY_MINUTES: u32 = 60;
const MAX_SUMMARY_MINUTES: u32 = 24 * 60;

/// Applies defaults and the configured ceiling to raw paging input.
pub fn page_request(
    config: &RuntimeConfig,
    page: Option<u32>,
    size: Option<u32>,
    sort: SortOrder,
) -> PageRequest {
    let size = size
        .filter(|s| *s > 0)
        .unwrap_or(config.default_page_size)
        .min(config.max_page_size.max(1));
    PageRequest::new(page.unwrap_or(1), size, sort)
}

pub async fn list_logs(state: &AppState, filter: &LogFilter, page: PageRequest) -> Vec<LogEntry> {
    match state.log_repo.list_logs(filter, page).await {
        Ok(rows) => rows.iter().map(|row| row.to_entry()).collect(),
        Err(err) => {
            state.metrics.record_query_error();
            error!(error = %err, "failed to list logs");
            Vec::new()
        }
    }
}

pub async fn count_logs(state: &AppState, filter: &LogFilter) -> u64 {
    match state.log_repo.count_logs(filter).await {
        Ok(total) => total,
        Err(err) => {
            state.metrics.record_query_error();
            error!(error = %err, "failed to count logs");
            0
        }
    }
}

/// One page plus the matching total. A store failure is logged and yields an
/// empty page with `error` set instead of an error.
pub async fn fetch_log_page(state: &AppState, filter: LogFilter, page: PageRequest) -> LogPage {
    let filter = filter.normalized();
    let rows = state.log_repo.list_logs(&filter, page).await;
    let total = state.log_repo.count_logs(&filter).await;
    match (rows, total) {
        (Ok(rows), Ok(total)) => LogPage {
            items: rows.iter().map(|row| row.to_entry()).collect(),
            total,
            page: page.page,
            size: page.size,
            error: None,
        },
        (Err(err), _) | (_, Err(err)) => {
            state.metrics.record_query_error();
            error!(error = %err, player = ?filter.player, "log page query failed");
            LogPage::empty(page, Some(READ_FAILED.to_string()))
        }
    }
}

pub async fn list_distinct_players(state: &AppState) -> Vec<String> {
    state.log_repo.distinct_players().await.unwrap_or_else(|err| {
        state.metrics.record_query_error();
        error!(error = %err, "failed to list players");
        Vec::new()
    })
}

/// Labels of the action codes present in the store.
pub async fn list_distinct_actions(state: &AppState) -> Vec<String> {
    match state.log_repo.distinct_actions().await {
        Ok(codes) => {
            let mut labels: Vec<String> = Vec::new();
            for code in codes {
                let label = ActionKind::from_code(i64::from(code)).label();
                if !labels.iter().any(|l| l == label) {
                    labels.push(label.to_string());
                }
            }
            labels
        }
        Err(err) => {
            state.metrics.record_query_error();
            error!(error = %err, "failed to list actions");
            Vec::new()
        }
    }
}

pub async fn count_by_action(state: &AppState, filter: LogFilter) -> Vec<ActionCount> {
    let filter = filter.normalized();
    state.log_repo.count_by_action(&filter).await.unwrap_or_else(|err| {
        state.metrics.record_query_error();
        error!(error = %err, "failed to count logs by action");
        Vec::new()
    })
}

/// Resolves the summary window. Explicit bounds win, a missing side
/// falling back to the epoch or `now`. Otherwise the window is the last
/// `last_minutes` (1..=1440, default 60) ending at `now`.
pub fn summary_window(
    from: Option<u32>,
    to: Option<u32>,
    last_minutes: Option<u32>,
    now: u32,
) -> (u32, u32) {
    if from.is_some() || to.is_some() {
        return (from.unwrap_or(0), to.unwrap_or(now));
    }
    let minutes = last_minutes
        .map(|m| m.clamp(1, MAX_SUMMARY_MINUTES))
        .unwrap_or(DEFAULT_SUMMARY_MINUTES);
    (now.saturating_sub(minutes * 60), now)
}

/// Action histogram restricted to the resolved window. `filter.from` and
/// `filter.to` are replaced by the window bounds.
pub async fn action_summary(
    state: &AppState,
    filter: LogFilter,
    last_minutes: Option<u32>,
) -> ActionSummary {
    let (from, to) = summary_window(filter.from, filter.to, last_minutes, now_epoch_seconds());
    let counts = count_by_action(state, filter.between(Some(from), Some(to))).await;
    ActionSummary::new(from, to, counts)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_support::{FakePool, FakeRepository};
    use backend_domain::{LogEvent, Location};

    fn state(repo: Arc<FakeRepository>) -> AppState {
        AppState::new(RuntimeConfig::default(), repo, Arc::new(FakePool::default()))
    }

    async fn seed(state: &AppState, events: Vec<LogEvent>) {
        for event in events {
            assert!(state.ingestor.enqueue_event(event));
        }
        state.writer.flush().await;
    }

    #[tokio::test]
    async fn alice_login_round_trip() {
        let repo = Arc::new(FakeRepository::default());
        let state = state(repo);
        let alice = LogEvent::new(
            "Alice",
            ActionKind::Login,
            "",
            Some(Location::new("world", 10, 64, -5)),
        )
        .unwrap();
        seed(&state, vec![alice]).await;

        let filter = LogFilter::new().player("Alice").action(ActionKind::from_label("Login"));
        let page = fetch_log_page(&state, filter, PageRequest::new(1, 10, SortOrder::Desc)).await;
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].location, "world (10, 64, -5)");
        assert_eq!(page.items[0].teleport, "/tp 10 64 -5");
        assert_eq!(page.items[0].action, "Login");
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_with_total() {
        let repo = Arc::new(FakeRepository::default());
        let state = state(repo);
        let events = (0..10)
            .map(|_| LogEvent::new("Bob", ActionKind::Chat, "hi", None).unwrap())
            .collect();
        seed(&state, events).await;

        let page = fetch_log_page(&state, LogFilter::new(), PageRequest::new(5, 25, SortOrder::Desc)).await;
        assert!(page.items.is_empty());
        assert_eq!(page.total, 10);
        assert!(page.error.is_none());
    }

    #[tokio::test]
    async fn pages_union_matches_count() {
        let repo = Arc::new(FakeRepository::default());
        let state = state(repo);
        let events = (0..23)
            .map(|i| LogEvent::new(format!("P{}", i % 3), ActionKind::BlockBroken, "stone", None).unwrap())
            .collect();
        seed(&state, events).await;

        let filter = LogFilter::new().player("P1");
        let total = count_logs(&state, &filter).await;
        let mut seen = 0;
        for page in 1..=5 {
            seen += list_logs(&state, &filter, PageRequest::new(page, 3, SortOrder::Asc)).await.len();
        }
        assert_eq!(seen as u64, total);
        assert_eq!(total, 8);
    }

    #[tokio::test]
    async fn read_failure_yields_empty_page_with_indicator() {
        let repo = Arc::new(FakeRepository::default());
        repo.fail_reads(true);
        let state = state(repo);
        let page = fetch_log_page(&state, LogFilter::new(), PageRequest::new(1, 25, SortOrder::Desc)).await;
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.error.as_deref(), Some(READ_FAILED));
        assert!(list_distinct_players(&state).await.is_empty());
        assert_eq!(count_logs(&state, &LogFilter::new()).await, 0);
    }

    #[tokio::test]
    async fn distinct_actions_are_labels() {
        let repo = Arc::new(FakeRepository::default());
        let state = state(repo);
        seed(
            &state,
            vec![
                LogEvent::new("Bob", ActionKind::Login, "", None).unwrap(),
                LogEvent::new("Bob", ActionKind::Login, "", None).unwrap(),
                LogEvent::new("Bob", ActionKind::ItemDrop, "DIRT", None).unwrap(),
            ],
        )
        .await;
        assert_eq!(list_distinct_actions(&state).await, vec!["Login", "Item Drop"]);
        let counts = count_by_action(&state, LogFilter::new()).await;
        assert_eq!(counts[0], ActionCount { action: "Login".into(), count: 2 });
    }

    #[test]
    fn summary_window_prefers_bounds_then_last_then_one_hour() {
        let now = 1_700_000_000;
        assert_eq!(summary_window(Some(10), Some(20), Some(5), now), (10, 20));
        assert_eq!(summary_window(Some(10), None, None, now), (10, now));
        assert_eq!(summary_window(None, None, Some(5), now), (now - 300, now));
        assert_eq!(summary_window(None, None, None, now), (now - 3_600, now));
        assert_eq!(summary_window(None, None, Some(0), now), (now - 60, now));
        assert_eq!(summary_window(None, None, Some(100_000), now), (now - 86_400, now));
    }

    #[tokio::test]
    async fn summary_defaults_to_the_last_hour() {
        let repo = Arc::new(FakeRepository::default());
        let state = state(repo);
        let two_hours_ago =
            backend_domain::parse_epoch_seconds(i64::from(now_epoch_seconds()) - 7_200).unwrap();
        seed(
            &state,
            vec![
                LogEvent::new("Bob", ActionKind::Login, "", None).unwrap(),
                LogEvent::new("Bob", ActionKind::Chat, "hi", None).unwrap(),
                LogEvent::at("Bob", ActionKind::Login, "", None, two_hours_ago).unwrap(),
            ],
        )
        .await;

        let summary = action_summary(&state, LogFilter::new(), None).await;
        assert_eq!(summary.total, 2);
        assert_eq!(summary.to - summary.from, 3_600);

        let wide = action_summary(&state, LogFilter::new(), Some(180)).await;
        assert_eq!(wide.total, 3);
        let logins = wide.counts.iter().find(|c| c.action == "Login").unwrap();
        assert_eq!(logins.count, 2);

        let chats = action_summary(&state, LogFilter::new().action(ActionKind::Chat), Some(180)).await;
        assert_eq!(chats.total, 1);
    }

    #[test]
    fn page_request_defaults_and_clamps() {
        let config = RuntimeConfig::default();
        let req = page_request(&config, None, None, SortOrder::Desc);
        assert_eq!((req.page, req.size), (1, 25));
        let req = page_request(&config, Some(3), Some(10_000), SortOrder::Asc);
        assert_eq!((req.page, req.size), (3, 500));
        let req = page_request(&config, Some(0), Some(0), SortOrder::Asc);
        assert_eq!((req.page, req.size), (1, 25));
    }
}
