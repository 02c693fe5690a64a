use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Connection, QueryBuilder};

use backend_domain::ports::LogRepository;
use backend_domain::{
    epoch_to_utc, truncate_chars, ActionCount, ActionKind, ContainerFilter, ContainerRecord,
    ContainerTransaction, LogEvent, LogFilter, LogRecord, Location, PageRequest,
    TransferDirection, DETAIL_MAX_CHARS,
};

use crate::db::pool::with_connection;
use crate::db::{ConnectionPool, SchemaManager};
use crate::repositories::sql_builder::{self, SqlParam};

const WORLD_MAX_CHARS: usize = 50;
const CONTAINER_TYPE_MAX_CHARS: usize = 50;
const MATERIAL_MAX_CHARS: usize = 100;

macro_rules! bind_params {
    ($query:expr, $params:expr) => {{
        let mut query = $query;
        for param in $params {
            query = match param {
                SqlParam::Text(value) => query.bind(value.as_str()),
                SqlParam::Int(value) => query.bind(*value),
            };
        }
        query
    }};
}

#[derive(Debug, sqlx::FromRow)]
struct LogRow {
    id: i64,
    time: u32,
    #[sqlx(rename = "playerName")]
    player_name: String,
    action: i8,
    detail: Option<String>,
    world: String,
    x: i32,
    y: i16,
    z: i32,
}

impl From<LogRow> for LogRecord {
    fn from(row: LogRow) -> Self {
        LogRecord {
            id: row.id,
            player_name: row.player_name,
            action: ActionKind::from_code(i64::from(row.action)),
            detail: row.detail.unwrap_or_default(),
            location: Location::from_columns(&row.world, row.x, row.y, row.z),
            timestamp: epoch_to_utc(row.time),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ContainerRow {
    id: i64,
    time: u32,
    #[sqlx(rename = "playerName")]
    player_name: String,
    action: i8,
    container_type: String,
    material: String,
    amount: i16,
    world: String,
    x: i32,
    y: i16,
    z: i32,
}

impl From<ContainerRow> for ContainerRecord {
    fn from(row: ContainerRow) -> Self {
        ContainerRecord {
            id: row.id,
            player_name: row.player_name,
            direction: TransferDirection::from_code(i64::from(row.action)),
            container_type: row.container_type,
            material: row.material,
            amount: row.amount,
            location: Location::new(row.world, row.x, row.y, row.z),
            time: epoch_to_utc(row.time),
        }
    }
}

/// Writes go through one transaction per batch with a single multi-row INSERT.
pub struct SqlLogRepository {
    pool: Arc<ConnectionPool>,
    detail_max_chars: usize,
}

impl SqlLogRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self {
            pool,
            detail_max_chars: DETAIL_MAX_CHARS,
        }
    }

    /// Caps stored details below the column width.
    pub fn with_detail_max_chars(mut self, max_chars: usize) -> Self {
        self.detail_max_chars = max_chars.clamp(1, DETAIL_MAX_CHARS);
        self
    }
}

#[async_trait]
impl LogRepository for SqlLogRepository {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        SchemaManager::ensure_tables(&self.pool).await?;
        Ok(())
    }

    async fn insert_logs(&self, events: &[LogEvent]) -> anyhow::Result<u64> {
        if events.is_empty() {
            return Ok(0);
        }
        let detail_max = self.detail_max_chars;
        let written = with_connection!(self.pool.acquire().await?, |conn, Db| {
            let mut tx = conn.begin().await?;
            let mut insert = QueryBuilder::<Db>::new(
                "INSERT INTO logs (time, playerName, action, detail, world, x, y, z) ",
            );
            insert.push_values(events, |mut row, event| {
                let (x, y, z) = event.coordinates();
                row.push_bind(event.epoch_seconds())
                    .push_bind(event.player_name())
                    .push_bind(event.action().code())
                    .push_bind(event.stored_detail(detail_max))
                    .push_bind(truncate_chars(event.world(), WORLD_MAX_CHARS))
                    .push_bind(x)
                    .push_bind(y)
                    .push_bind(z);
            });
            let result = insert.build().execute(&mut *tx).await?;
            tx.commit().await?;
            result.rows_affected()
        });
        Ok(written)
    }

    async fn insert_container_transactions(
        &self,
        transactions: &[ContainerTransaction],
    ) -> anyhow::Result<u64> {
        if transactions.is_empty() {
            return Ok(0);
        }
        let written = with_connection!(self.pool.acquire().await?, |conn, Db| {
            let mut tx = conn.begin().await?;
            let mut insert = QueryBuilder::<Db>::new(
                "INSERT INTO container_transactions \
                 (time, playerName, action, container_type, material, amount, world, x, y, z) ",
            );
            insert.push_values(transactions, |mut row, item| {
                let loc = item.location();
                row.push_bind(item.time())
                    .push_bind(item.player_name())
                    .push_bind(item.direction().code())
                    .push_bind(truncate_chars(item.container_type(), CONTAINER_TYPE_MAX_CHARS))
                    .push_bind(truncate_chars(item.material(), MATERIAL_MAX_CHARS))
                    .push_bind(item.amount())
                    .push_bind(truncate_chars(&loc.world, WORLD_MAX_CHARS))
                    .push_bind(loc.x)
                    .push_bind(loc.y)
                    .push_bind(loc.z);
            });
            let result = insert.build().execute(&mut *tx).await?;
            tx.commit().await?;
            result.rows_affected()
        });
        Ok(written)
    }

    async fn list_logs(&self, filter: &LogFilter, page: PageRequest) -> anyhow::Result<Vec<LogRecord>> {
        let query = sql_builder::select_logs(filter, page);
        let rows = with_connection!(self.pool.acquire().await?, |conn, Db| {
            bind_params!(sqlx::query_as::<Db, LogRow>(&query.sql), &query.params)
                .fetch_all(&mut *conn)
                .await?
        });
        Ok(rows.into_iter().map(LogRecord::from).collect())
    }

    async fn count_logs(&self, filter: &LogFilter) -> anyhow::Result<u64> {
        let query = sql_builder::count_logs(filter);
        let total: i64 = with_connection!(self.pool.acquire().await?, |conn, Db| {
            bind_params!(sqlx::query_scalar::<Db, i64>(&query.sql), &query.params)
                .fetch_one(&mut *conn)
                .await?
        });
        Ok(total.max(0) as u64)
    }

    async fn distinct_players(&self) -> anyhow::Result<Vec<String>> {
        let players = with_connection!(self.pool.acquire().await?, |conn, Db| {
            sqlx::query_scalar::<Db, String>(sql_builder::DISTINCT_PLAYERS_SQL)
                .fetch_all(&mut *conn)
                .await?
        });
        Ok(players)
    }

    async fn distinct_actions(&self) -> anyhow::Result<Vec<i8>> {
        let codes = with_connection!(self.pool.acquire().await?, |conn, Db| {
            sqlx::query_scalar::<Db, i8>(sql_builder::DISTINCT_ACTIONS_SQL)
                .fetch_all(&mut *conn)
                .await?
        });
        Ok(codes)
    }

    async fn count_by_action(&self, filter: &LogFilter) -> anyhow::Result<Vec<ActionCount>> {
        let query = sql_builder::count_by_action(filter);
        let rows: Vec<(i8, i64)> = with_connection!(self.pool.acquire().await?, |conn, Db| {
            bind_params!(sqlx::query_as::<Db, (i8, i64)>(&query.sql), &query.params)
                .fetch_all(&mut *conn)
                .await?
        });
        // Distinct unrecognized codes share the "Unknown" label.
        let mut counts: Vec<ActionCount> = Vec::with_capacity(rows.len());
        for (code, total) in rows {
            let label = ActionKind::from_code(i64::from(code)).label();
            let total = total.max(0) as u64;
            match counts.iter_mut().find(|c| c.action == label) {
                Some(existing) => existing.count += total,
                None => counts.push(ActionCount {
                    action: label.to_string(),
                    count: total,
                }),
            }
        }
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(counts)
    }

    async fn list_container_transactions(
        &self,
        filter: &ContainerFilter,
        page: PageRequest,
    ) -> anyhow::Result<Vec<ContainerRecord>> {
        let query = sql_builder::select_container_transactions(filter, page);
        let rows = with_connection!(self.pool.acquire().await?, |conn, Db| {
            bind_params!(sqlx::query_as::<Db, ContainerRow>(&query.sql), &query.params)
                .fetch_all(&mut *conn)
                .await?
        });
        Ok(rows.into_iter().map(ContainerRecord::from).collect())
    }

    async fn count_container_transactions(&self, filter: &ContainerFilter) -> anyhow::Result<u64> {
        let query = sql_builder::count_container_transactions(filter);
        let total: i64 = with_connection!(self.pool.acquire().await?, |conn, Db| {
            bind_params!(sqlx::query_scalar::<Db, i64>(&query.sql), &query.params)
                .fetch_one(&mut *conn)
                .await?
        });
        Ok(total.max(0) as u64)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        with_connection!(self.pool.acquire().await?, |conn, Db| {
            sqlx::query::<Db>("SELECT 1").execute(&mut *conn).await?;
        });
        Ok(())
    }
}
