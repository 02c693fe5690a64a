use tracing::error;

use backend_domain::{ContainerFilter, ContainerPage, PageRequest};

use crate::AppState;

pub async fn fetch_container_page(
    state: &AppState,
    filter: ContainerFilter,
    page: PageRequest,
) -> ContainerPage {
    let filter = filter.normalized();
    let rows = state.log_repo.list_container_transactions(&filter, page).await;
    let total = state.log_repo.count_container_transactions(&filter).await;
    match (rows, total) {
        (Ok(items), Ok(total)) => ContainerPage {
            items,
            total,
            page: page.page,
            size: page.size,
            error: None,
        },
        (Err(err), _) | (_, Err(err)) => {
            state.metrics.record_query_error();
            error!(error = %err, "container transaction query failed");
            ContainerPage::empty(page, Some("failed to load container transactions".to_string()))
        }
    }
}
