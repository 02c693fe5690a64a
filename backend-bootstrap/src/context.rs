use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use backend_application::{AppState, WriterHandle};
use backend_domain::ports::LogRepository;
use backend_infrastructure::{AppConfig, ConnectionPool, SqlLogRepository};

/// Everything built once at startup and torn down in order at shutdown.
pub struct AppContext {
    pub state: AppState,
    pub pool: Arc<ConnectionPool>,
    pub writer: WriterHandle,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        Self::from_config(&config).await
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate().context("invalid configuration")?;
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config();

        let pool = Arc::new(
            ConnectionPool::connect(&db_config)
                .await
                .context("failed to build connection pool")?,
        );
        let repo = Arc::new(
            SqlLogRepository::new(pool.clone())
                .with_detail_max_chars(runtime_config.detail_max_chars),
        );
        repo.ensure_schema()
            .await
            .context("failed to create schema")?;

        let flush_interval = Duration::from_millis(runtime_config.flush_interval_ms);
        let state = AppState::new(runtime_config, repo, pool.clone());
        let writer = state.writer.clone().spawn(flush_interval);

        Ok(Self {
            state,
            pool,
            writer,
        })
    }

    /// Stops the flush schedule, drains the queues, then closes the pool.
    pub async fn shutdown(&self) {
        let report = self.writer.shutdown().await;
        self.pool.close().await;
        info!(
            persisted = report.persisted(),
            pool = %self.pool.stats(),
            "backend stopped"
        );
    }
}
