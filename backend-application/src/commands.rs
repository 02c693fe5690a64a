pub mod ingest_commands;
pub mod ops_commands;
