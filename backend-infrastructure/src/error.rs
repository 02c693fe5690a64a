use thiserror::Error;

/// Errors raised by the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The URL scheme selects neither MySQL nor SQLite.
    #[error("unsupported database url: {0}")]
    UnsupportedUrl(String),

    #[error("invalid database name: {0}")]
    InvalidDatabaseName(String),

    #[error("connection pool is closed")]
    Closed,
}
