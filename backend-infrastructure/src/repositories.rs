pub mod sql_builder;
pub mod sql_log_repository;

pub use sql_log_repository::SqlLogRepository;
