use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{MySql, MySqlPool, Sqlite, SqlitePool};
use tracing::info;

use backend_domain::ports::StoragePool;
use backend_domain::{DbConfig, PoolStats};

use crate::db::SchemaManager;
use crate::error::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    MySql,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> Result<Self, StorageError> {
        let url = url.trim();
        if url.starts_with("mysql://") || url.starts_with("mariadb://") {
            Ok(Backend::MySql)
        } else if url.starts_with("sqlite:") {
            Ok(Backend::Sqlite)
        } else {
            Err(StorageError::UnsupportedUrl(url.to_string()))
        }
    }
}

#[derive(Debug, Clone)]
pub enum DbPool {
    MySql(MySqlPool),
    Sqlite(SqlitePool),
}

/// A connection leased from the pool; returned to it on drop.
pub enum PooledConnection {
    MySql(PoolConnection<MySql>),
    Sqlite(PoolConnection<Sqlite>),
}

/// Expands `$body` once per backend with `$conn` bound to the concrete
/// leased connection and `$db` aliased to the sqlx database type.
macro_rules! with_connection {
    ($leased:expr, |$conn:ident, $db:ident| $body:block) => {
        match $leased {
            $crate::db::PooledConnection::MySql(mut $conn) => {
                #[allow(dead_code)]
                type $db = sqlx::MySql;
                $body
            }
            $crate::db::PooledConnection::Sqlite(mut $conn) => {
                #[allow(dead_code)]
                type $db = sqlx::Sqlite;
                $body
            }
        }
    };
}
pub(crate) use with_connection;

/// Shared pool over MySQL (production) or SQLite (single node, tests).
pub struct ConnectionPool {
    pool: DbPool,
    waiting: AtomicU32,
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("backend", &self.backend())
            .finish_non_exhaustive()
    }
}

struct WaitGuard<'a>(&'a AtomicU32);

impl<'a> WaitGuard<'a> {
    fn enter(counter: &'a AtomicU32) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ConnectionPool {
    /// Creates the database if needed, then opens the pool against it.
    ///
    /// For MySQL the database is created with `utf8mb4` before the pool
    /// connects to it. For SQLite the URL names the database file and
    /// `config.database` is not used.
    pub async fn connect(config: &DbConfig) -> Result<Self, StorageError> {
        let acquire_timeout = Duration::from_secs(config.acquire_timeout_seconds.max(1));
        let max = config.max_connections.max(1);
        let min = config.min_idle.min(max);

        let backend = Backend::from_url(&config.url)?;
        let pool = match backend {
            Backend::MySql => {
                SchemaManager::ensure_database(&config.url, &config.database).await?;
                let options = MySqlConnectOptions::from_str(config.url.trim())?
                    .database(&config.database)
                    .charset("utf8mb4");
                let pool = MySqlPoolOptions::new()
                    .max_connections(max)
                    .min_connections(min)
                    .acquire_timeout(acquire_timeout)
                    .connect_with(options)
                    .await?;
                DbPool::MySql(pool)
            }
            Backend::Sqlite => {
                let options = SqliteConnectOptions::from_str(config.url.trim())?
                    .journal_mode(SqliteJournalMode::Wal)
                    .synchronous(SqliteSynchronous::Normal)
                    .busy_timeout(acquire_timeout)
                    .create_if_missing(true);
                let pool = SqlitePoolOptions::new()
                    .max_connections(max)
                    .min_connections(min)
                    .acquire_timeout(acquire_timeout)
                    .connect_with(options)
                    .await?;
                DbPool::Sqlite(pool)
            }
        };

        info!(
            ?backend,
            database = %config.database,
            max_connections = max,
            min_idle = min,
            "connection pool ready"
        );
        Ok(Self {
            pool,
            waiting: AtomicU32::new(0),
        })
    }

    pub fn backend(&self) -> Backend {
        match self.pool {
            DbPool::MySql(_) => Backend::MySql,
            DbPool::Sqlite(_) => Backend::Sqlite,
        }
    }

    pub fn inner(&self) -> &DbPool {
        &self.pool
    }

    /// Leases a connection, waiting at most the configured acquire timeout.
    pub async fn acquire(&self) -> Result<PooledConnection, StorageError> {
        if self.is_closed() {
            return Err(StorageError::Closed);
        }
        let _waiting = WaitGuard::enter(&self.waiting);
        let conn = match &self.pool {
            DbPool::MySql(pool) => PooledConnection::MySql(pool.acquire().await?),
            DbPool::Sqlite(pool) => PooledConnection::Sqlite(pool.acquire().await?),
        };
        Ok(conn)
    }

    pub fn stats(&self) -> PoolStats {
        let (total, idle) = match &self.pool {
            DbPool::MySql(pool) => (pool.size(), pool.num_idle()),
            DbPool::Sqlite(pool) => (pool.size(), pool.num_idle()),
        };
        let idle = u32::try_from(idle).unwrap_or(u32::MAX).min(total);
        PoolStats {
            active: total - idle,
            idle,
            total,
            waiting: self.waiting.load(Ordering::SeqCst),
        }
    }

    pub fn is_closed(&self) -> bool {
        match &self.pool {
            DbPool::MySql(pool) => pool.is_closed(),
            DbPool::Sqlite(pool) => pool.is_closed(),
        }
    }

    /// Idempotent.
    pub async fn close(&self) {
        match &self.pool {
            DbPool::MySql(pool) => pool.close().await,
            DbPool::Sqlite(pool) => pool.close().await,
        }
    }
}

#[async_trait]
impl StoragePool for ConnectionPool {
    fn stats(&self) -> PoolStats {
        ConnectionPool::stats(self)
    }

    fn is_closed(&self) -> bool {
        ConnectionPool::is_closed(self)
    }

    async fn close(&self) {
        ConnectionPool::close(self).await;
    }
}
