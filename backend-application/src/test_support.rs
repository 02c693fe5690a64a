use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use backend_domain::ports::{LogRepository, StoragePool};
use backend_domain::{
    epoch_to_utc, ActionCount, ActionKind, ContainerFilter, ContainerRecord, ContainerTransaction,
    LogEvent, LogFilter, LogRecord, PageRequest, PoolStats, SortOrder,
};

#[derive(Default)]
pub struct FakeRepository {
    logs: Mutex<Vec<LogRecord>>,
    containers: Mutex<Vec<ContainerRecord>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl FakeRepository {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn log_count(&self) -> usize {
        self.logs.lock().unwrap().len()
    }

    fn check_read(&self) -> anyhow::Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("store unavailable");
        }
        Ok(())
    }

    fn matching_logs(&self, filter: &LogFilter) -> Vec<LogRecord> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .filter(|row| filter.player.as_ref().map_or(true, |p| &row.player_name == p))
            .filter(|row| filter.action.map_or(true, |a| row.action == a))
            .filter(|row| {
                filter
                    .detail_contains
                    .as_ref()
                    .map_or(true, |needle| row.detail.contains(needle.as_str()))
            })
            .filter(|row| {
                let ts = row.timestamp.timestamp();
                filter.from.map_or(true, |from| ts >= i64::from(from))
                    && filter.to.map_or(true, |to| ts <= i64::from(to))
            })
            .cloned()
            .collect()
    }

    fn matching_containers(&self, filter: &ContainerFilter) -> Vec<ContainerRecord> {
        self.containers
            .lock()
            .unwrap()
            .iter()
            .filter(|row| filter.player.as_ref().map_or(true, |p| &row.player_name == p))
            .filter(|row| filter.direction.map_or(true, |d| row.direction == d))
            .filter(|row| {
                filter
                    .material_contains
                    .as_ref()
                    .map_or(true, |needle| row.material.contains(needle.as_str()))
            })
            .cloned()
            .collect()
    }
}

fn paginate<T, K: Ord>(mut rows: Vec<T>, page: PageRequest, key: impl Fn(&T) -> K) -> Vec<T> {
    rows.sort_by_key(|row| key(row));
    if page.sort == SortOrder::Desc {
        rows.reverse();
    }
    rows.into_iter()
        .skip(page.offset() as usize)
        .take(page.size as usize)
        .collect()
}

#[async_trait]
impl LogRepository for FakeRepository {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn insert_logs(&self, events: &[LogEvent]) -> anyhow::Result<u64> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        let mut logs = self.logs.lock().unwrap();
        for event in events {
            let id = logs.len() as i64 + 1;
            logs.push(LogRecord {
                id,
                player_name: event.player_name().to_string(),
                action: event.action(),
                detail: event.detail().to_string(),
                location: event.location().cloned(),
                timestamp: event.timestamp(),
            });
        }
        Ok(events.len() as u64)
    }

    async fn insert_container_transactions(
        &self,
        transactions: &[ContainerTransaction],
    ) -> anyhow::Result<u64> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        let mut rows = self.containers.lock().unwrap();
        for tx in transactions {
            let id = rows.len() as i64 + 1;
            rows.push(ContainerRecord {
                id,
                player_name: tx.player_name().to_string(),
                direction: tx.direction(),
                container_type: tx.container_type().to_string(),
                material: tx.material().to_string(),
                amount: tx.amount(),
                location: tx.location().clone(),
                time: epoch_to_utc(tx.time()),
            });
        }
        Ok(transactions.len() as u64)
    }

    async fn list_logs(&self, filter: &LogFilter, page: PageRequest) -> anyhow::Result<Vec<LogRecord>> {
        self.check_read()?;
        Ok(paginate(self.matching_logs(filter), page, |row| (row.timestamp, row.id)))
    }

    async fn count_logs(&self, filter: &LogFilter) -> anyhow::Result<u64> {
        self.check_read()?;
        Ok(self.matching_logs(filter).len() as u64)
    }

    async fn distinct_players(&self) -> anyhow::Result<Vec<String>> {
        self.check_read()?;
        let mut players: Vec<String> = self
            .logs
            .lock()
            .unwrap()
            .iter()
            .map(|row| row.player_name.clone())
            .collect();
        players.sort();
        players.dedup();
        Ok(players)
    }

    async fn distinct_actions(&self) -> anyhow::Result<Vec<i8>> {
        self.check_read()?;
        let mut codes: Vec<i8> = self.logs.lock().unwrap().iter().map(|row| row.action.code()).collect();
        codes.sort();
        codes.dedup();
        Ok(codes)
    }

    async fn count_by_action(&self, filter: &LogFilter) -> anyhow::Result<Vec<ActionCount>> {
        self.check_read()?;
        let rows = self.matching_logs(filter);
        let mut counts = Vec::new();
        for kind in ActionKind::ALL.into_iter().chain([ActionKind::Unknown]) {
            let count = rows.iter().filter(|row| row.action == kind).count() as u64;
            if count > 0 {
                counts.push(ActionCount {
                    action: kind.label().to_string(),
                    count,
                });
            }
        }
        Ok(counts)
    }

    async fn list_container_transactions(
        &self,
        filter: &ContainerFilter,
        page: PageRequest,
    ) -> anyhow::Result<Vec<ContainerRecord>> {
        self.check_read()?;
        Ok(paginate(self.matching_containers(filter), page, |row| (row.time, row.id)))
    }

    async fn count_container_transactions(&self, filter: &ContainerFilter) -> anyhow::Result<u64> {
        self.check_read()?;
        Ok(self.matching_containers(filter).len() as u64)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.check_read()
    }
}

#[derive(Default)]
pub struct FakePool {
    closed: AtomicBool,
}

#[async_trait]
impl StoragePool for FakePool {
    fn stats(&self) -> PoolStats {
        PoolStats {
            active: 1,
            idle: 4,
            total: 5,
            waiting: 0,
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
