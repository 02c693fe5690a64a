use std::time::Duration;

use tokio::time::timeout;
use tracing::warn;

use backend_domain::{PoolStats, QueueStats};

use crate::AppState;

pub fn queue_stats(state: &AppState) -> QueueStats {
    state.queues.stats()
}

pub fn pool_stats(state: &AppState) -> PoolStats {
    state.pool.stats()
}

/// True when the store answers a ping within `limit`.
pub async fn check_ready(state: &AppState, limit: Duration) -> bool {
    if state.pool.is_closed() {
        return false;
    }
    match timeout(limit, state.log_repo.ping()).await {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            warn!(error = %err, "readiness ping failed");
            false
        }
        Err(_) => {
            warn!("readiness ping timed out");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_support::{FakePool, FakeRepository};
    use backend_domain::ports::StoragePool;
    use backend_domain::RuntimeConfig;

    #[tokio::test]
    async fn readiness_follows_ping_and_pool_state() {
        let repo = Arc::new(FakeRepository::default());
        let pool = Arc::new(FakePool::default());
        let state = AppState::new(RuntimeConfig::default(), repo.clone(), pool.clone());
        let limit = Duration::from_secs(1);

        assert!(check_ready(&state, limit).await);

        repo.fail_reads(true);
        assert!(!check_ready(&state, limit).await);

        repo.fail_reads(false);
        pool.close().await;
        assert!(!check_ready(&state, limit).await);
    }
}
