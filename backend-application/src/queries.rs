pub mod container_queries;
pub mod log_queries;
pub mod ops_queries;
