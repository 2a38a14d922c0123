//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] latch_storage::StorageError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] latch_persistence::PersistenceError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User email cannot be empty")]
    EmptyEmail,
}
