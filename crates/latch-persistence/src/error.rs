//! Persistence error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Storage error: {0}")]
    Storage(#[from] latch_storage::StorageError),

    #[error("Unknown persistable key: {0}")]
    InvalidKey(String),

    #[error("Unknown persistence relationship: {0}")]
    UnknownRelationship(String),
}
