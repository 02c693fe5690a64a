use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use chrono::Local;
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, RuntimeConfig};

/// SQLite inserts bind one placeholder per column; keep batches under its limit.
const MAX_BATCH_SIZE: usize = 2_000;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub database_url: String,
    pub database_name: String,
    pub database_suffix_date: bool,
    pub pool_max_connections: u32,
    pub pool_min_idle: u32,
    pub pool_acquire_timeout_seconds: u64,
    pub queue_capacity: usize,
    pub batch_size: usize,
    pub flush_interval_ms: u64,
    pub detail_max_chars: usize,
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            api_token: None,
            database_url: "mysql://root@127.0.0.1:3306".to_string(),
            database_name: "minecraft_logs".to_string(),
            database_suffix_date: false,
            pool_max_connections: 25,
            pool_min_idle: 5,
            pool_acquire_timeout_seconds: 30,
            queue_capacity: 100_000,
            batch_size: 500,
            flush_interval_ms: 1000,
            detail_max_chars: 255,
            default_page_size: 25,
            max_page_size: 500,
            max_body_bytes: 8 * 1024 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

impl AppConfig {
    /// Reads `ACTIONLOG_CONFIG` (default `./config.toml`), then applies
    /// `ACTIONLOG_*` overrides.
    pub async fn load() -> Result<Self> {
        let path = env::var("ACTIONLOG_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        Self::load_from(&path).await
    }

    pub async fn load_from(path: &str) -> Result<Self> {
        let file_path = Path::new(path);
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str(&content)?
        } else {
            warn!(path, "config file not found, using defaults");
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(api_token) = &self.api_token {
            if api_token.trim().is_empty() {
                self.api_token = None;
            }
        }
        self.database_url = self.database_url.trim().to_string();
        self.database_name = self.database_name.trim().to_string();
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if !(self.database_url.starts_with("mysql://")
            || self.database_url.starts_with("mariadb://")
            || self.database_url.starts_with("sqlite:"))
        {
            return Err(anyhow!(
                "database_url must start with mysql:// or sqlite:, got '{}'",
                self.database_url
            ));
        }
        if self.database_name.is_empty() {
            return Err(anyhow!("database_name must not be empty"));
        }
        if self.pool_max_connections == 0 {
            return Err(anyhow!("pool_max_connections must be greater than 0"));
        }
        if self.pool_min_idle > self.pool_max_connections {
            return Err(anyhow!("pool_min_idle must not exceed pool_max_connections"));
        }
        if self.queue_capacity == 0 {
            return Err(anyhow!("queue_capacity must be greater than 0"));
        }
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(anyhow!("batch_size must be between 1 and {}", MAX_BATCH_SIZE));
        }
        if self.flush_interval_ms == 0 {
            return Err(anyhow!("flush_interval_ms must be greater than 0"));
        }
        if self.detail_max_chars == 0 || self.detail_max_chars > 255 {
            return Err(anyhow!("detail_max_chars must be between 1 and 255"));
        }
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(anyhow!("page sizes must be greater than 0"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            queue_capacity: self.queue_capacity,
            batch_size: self.batch_size,
            flush_interval_ms: self.flush_interval_ms,
            detail_max_chars: self.detail_max_chars,
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        let database = if self.database_suffix_date {
            format!("{}_{}", self.database_name, Local::now().format("%Y%m%d"))
        } else {
            self.database_name.clone()
        };
        DbConfig {
            url: self.database_url.clone(),
            database,
            max_connections: self.pool_max_connections,
            min_idle: self.pool_min_idle,
            acquire_timeout_seconds: self.pool_acquire_timeout_seconds,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("ACTIONLOG_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("ACTIONLOG_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("ACTIONLOG_DATABASE_URL") {
            self.database_url = value;
        }
        if let Ok(value) = env::var("ACTIONLOG_DATABASE_NAME") {
            self.database_name = value;
        }
        if let Ok(value) = env::var("ACTIONLOG_DATABASE_SUFFIX_DATE") {
            self.database_suffix_date = value.parse().unwrap_or(self.database_suffix_date);
        }
        if let Ok(value) = env::var("ACTIONLOG_POOL_MAX_CONNECTIONS") {
            self.pool_max_connections = value.parse().unwrap_or(self.pool_max_connections);
        }
        if let Ok(value) = env::var("ACTIONLOG_POOL_MIN_IDLE") {
            self.pool_min_idle = value.parse().unwrap_or(self.pool_min_idle);
        }
        if let Ok(value) = env::var("ACTIONLOG_POOL_ACQUIRE_TIMEOUT_SECONDS") {
            self.pool_acquire_timeout_seconds =
                value.parse().unwrap_or(self.pool_acquire_timeout_seconds);
        }
        if let Ok(value) = env::var("ACTIONLOG_QUEUE_CAPACITY") {
            self.queue_capacity = value.parse().unwrap_or(self.queue_capacity);
        }
        if let Ok(value) = env::var("ACTIONLOG_BATCH_SIZE") {
            self.batch_size = value.parse().unwrap_or(self.batch_size);
        }
        if let Ok(value) = env::var("ACTIONLOG_FLUSH_INTERVAL_MS") {
            self.flush_interval_ms = value.parse().unwrap_or(self.flush_interval_ms);
        }
        if let Ok(value) = env::var("ACTIONLOG_DETAIL_MAX_CHARS") {
            self.detail_max_chars = value.parse().unwrap_or(self.detail_max_chars);
        }
        if let Ok(value) = env::var("ACTIONLOG_DEFAULT_PAGE_SIZE") {
            self.default_page_size = value.parse().unwrap_or(self.default_page_size);
        }
        if let Ok(value) = env::var("ACTIONLOG_MAX_PAGE_SIZE") {
            self.max_page_size = value.parse().unwrap_or(self.max_page_size);
        }
        if let Ok(value) = env::var("ACTIONLOG_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("ACTIONLOG_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        let db = config.to_db_config();
        assert_eq!(db.database, "minecraft_logs");
        assert_eq!((db.max_connections, db.min_idle), (25, 5));
        assert_eq!(config.to_runtime_config().queue_capacity, 100_000);
    }

    #[test]
    fn parses_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            database_url = "sqlite:data/actions.db"
            batch_size = 250
            api_token = "  "
            "#,
        )
        .unwrap();
        let mut config = config;
        config.normalize();
        config.validate().unwrap();
        assert_eq!(config.batch_size, 250);
        assert_eq!(config.flush_interval_ms, 1000);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn rejects_inconsistent_pool_and_zero_sizes() {
        let config = AppConfig {
            pool_min_idle: 30,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            queue_capacity: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            database_url: "postgres://localhost".into(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn date_suffix_is_appended() {
        let config = AppConfig {
            database_suffix_date: true,
            ..AppConfig::default()
        };
        let name = config.to_db_config().database;
        assert!(name.starts_with("minecraft_logs_"));
        assert_eq!(name.len(), "minecraft_logs_".len() + 8);
    }
}
