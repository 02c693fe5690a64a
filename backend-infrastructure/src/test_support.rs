use backend_domain::DbConfig;
use tempfile::TempDir;

/// SQLite database file inside `dir`, small pool.
pub fn sqlite_config(dir: &TempDir) -> DbConfig {
    DbConfig {
        url: format!("sqlite:{}", dir.path().join("actions.db").display()),
        database: "minecraft_logs".to_string(),
        max_connections: 4,
        min_idle: 1,
        acquire_timeout_seconds: 5,
    }
}
