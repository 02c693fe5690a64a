use async_trait::async_trait;

use crate::entities::PoolStats;

/// Shared connection pool as seen by the application layer.
#[async_trait]
pub trait StoragePool: Send + Sync {
    fn stats(&self) -> PoolStats;
    fn is_closed(&self) -> bool;
    /// Idempotent; waits for leased connections to be returned.
    async fn close(&self);
}
