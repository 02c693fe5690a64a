use std::str::FromStr;

use sqlx::mysql::MySqlConnectOptions;
use sqlx::{ConnectOptions, Connection};
use tracing::info;

use crate::db::{ConnectionPool, DbPool};
use crate::error::StorageError;

pub const MYSQL_LOGS_TABLE_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS logs (
    id         BIGINT AUTO_INCREMENT PRIMARY KEY,
    time       INT UNSIGNED NOT NULL,
    playerName VARCHAR(16) NOT NULL,
    action     TINYINT NOT NULL,
    detail     VARCHAR(255),
    world      VARCHAR(50) NOT NULL,
    x          INT NOT NULL,
    y          SMALLINT NOT NULL,
    z          INT NOT NULL,
    amount     SMALLINT NOT NULL DEFAULT 1,
    INDEX idx_time (time),
    INDEX idx_player (playerName, time)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
"#;

pub const MYSQL_CONTAINER_TABLE_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS container_transactions (
    id             BIGINT AUTO_INCREMENT PRIMARY KEY,
    time           INT UNSIGNED NOT NULL,
    playerName     VARCHAR(16) NOT NULL,
    action         TINYINT NOT NULL,
    container_type VARCHAR(50) NOT NULL,
    material       VARCHAR(100) NOT NULL,
    amount         SMALLINT NOT NULL,
    world          VARCHAR(50) NOT NULL,
    x              INT NOT NULL,
    y              SMALLINT NOT NULL,
    z              INT NOT NULL,
    INDEX idx_container_player (playerName, time)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
"#;

pub const SQLITE_LOGS_TABLE_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS logs (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    time       INTEGER NOT NULL,
    playerName TEXT NOT NULL,
    action     INTEGER NOT NULL,
    detail     TEXT,
    world      TEXT NOT NULL,
    x          INTEGER NOT NULL,
    y          INTEGER NOT NULL,
    z          INTEGER NOT NULL,
    amount     INTEGER NOT NULL DEFAULT 1
)
"#;

pub const SQLITE_CONTAINER_TABLE_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS container_transactions (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    time           INTEGER NOT NULL,
    playerName     TEXT NOT NULL,
    action         INTEGER NOT NULL,
    container_type TEXT NOT NULL,
    material       TEXT NOT NULL,
    amount         INTEGER NOT NULL,
    world          TEXT NOT NULL,
    x              INTEGER NOT NULL,
    y              INTEGER NOT NULL,
    z              INTEGER NOT NULL
)
"#;

pub const SQLITE_INDEXES_DDL: [&str; 3] = [
    "CREATE INDEX IF NOT EXISTS idx_time ON logs (time)",
    "CREATE INDEX IF NOT EXISTS idx_player ON logs (playerName, time)",
    "CREATE INDEX IF NOT EXISTS idx_container_player ON container_transactions (playerName, time)",
];

/// Create-if-absent bootstrap. Existing tables are never altered.
pub struct SchemaManager;

impl SchemaManager {
    /// Creates the MySQL database with `utf8mb4` if it is missing. Runs over
    /// a standalone connection that has no default database selected.
    pub async fn ensure_database(server_url: &str, database: &str) -> Result<(), StorageError> {
        validate_database_name(database)?;
        let options = MySqlConnectOptions::from_str(server_url.trim())?;
        let mut conn = options.connect().await?;
        let ddl = format!(
            "CREATE DATABASE IF NOT EXISTS `{database}` CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci"
        );
        sqlx::query(&ddl).execute(&mut conn).await?;
        conn.close().await?;
        info!(database, "database ensured");
        Ok(())
    }

    /// Creates both tables and their indexes when absent. Safe on every start.
    pub async fn ensure_tables(pool: &ConnectionPool) -> Result<(), StorageError> {
        match pool.inner() {
            DbPool::MySql(pool) => {
                sqlx::query(MYSQL_LOGS_TABLE_DDL).execute(pool).await?;
                sqlx::query(MYSQL_CONTAINER_TABLE_DDL).execute(pool).await?;
            }
            DbPool::Sqlite(pool) => {
                sqlx::query(SQLITE_LOGS_TABLE_DDL).execute(pool).await?;
                sqlx::query(SQLITE_CONTAINER_TABLE_DDL).execute(pool).await?;
                for ddl in SQLITE_INDEXES_DDL {
                    sqlx::query(ddl).execute(pool).await?;
                }
            }
        }
        info!("schema ensured");
        Ok(())
    }
}

/// Database names are interpolated into DDL, so only `[A-Za-z0-9_$]` is allowed.
pub fn validate_database_name(name: &str) -> Result<(), StorageError> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidDatabaseName(name.to_string()))
    }
}
