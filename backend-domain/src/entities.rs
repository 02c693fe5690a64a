// Domain entities
pub mod config;
pub mod container_transaction;
pub mod ingest;
pub mod log_event;
pub mod query;
pub mod stats;

pub use config::*;
pub use container_transaction::*;
pub use ingest::*;
pub use log_event::*;
pub use query::*;
pub use stats::*;
