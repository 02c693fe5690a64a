use async_trait::async_trait;

use crate::entities::{
    ActionCount,
    ContainerFilter,
    ContainerRecord,
    ContainerTransaction,
    LogEvent,
    LogFilter,
    LogRecord,
    PageRequest,
};

#[async_trait]
pub trait LogRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;

    /// Persists the whole batch in one transaction; returns rows written.
    async fn insert_logs(&self, events: &[LogEvent]) -> anyhow::Result<u64>;
    async fn insert_container_transactions(
        &self,
        transactions: &[ContainerTransaction],
    ) -> anyhow::Result<u64>;

    async fn list_logs(&self, filter: &LogFilter, page: PageRequest) -> anyhow::Result<Vec<LogRecord>>;
    async fn count_logs(&self, filter: &LogFilter) -> anyhow::Result<u64>;
    async fn distinct_players(&self) -> anyhow::Result<Vec<String>>;
    async fn distinct_actions(&self) -> anyhow::Result<Vec<i8>>;
    async fn count_by_action(&self, filter: &LogFilter) -> anyhow::Result<Vec<ActionCount>>;

    async fn list_container_transactions(
        &self,
        filter: &ContainerFilter,
        page: PageRequest,
    ) -> anyhow::Result<Vec<ContainerRecord>>;
    async fn count_container_transactions(&self, filter: &ContainerFilter) -> anyhow::Result<u64>;

    async fn ping(&self) -> anyhow::Result<()>;
}
