pub mod config;
pub mod db;
pub mod error;
pub mod repositories;

#[cfg(test)]
mod test_support;

pub use config::*;
pub use db::*;
pub use error::StorageError;
pub use repositories::*;
