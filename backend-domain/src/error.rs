// Domain validation errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("player name is empty")]
    EmptyPlayerName,
    #[error("player name exceeds {max} characters: {name}")]
    PlayerNameTooLong { name: String, max: usize },
    #[error("material is empty")]
    EmptyMaterial,
    #[error("container action must be 0 (taken) or 1 (placed), got {0}")]
    InvalidDirection(i64),
    #[error("timestamp out of range: {0}")]
    InvalidTimestamp(i64),
}
