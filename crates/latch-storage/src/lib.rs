//! Latch Storage Layer
//!
//! SQLite connection handle and schema for users and their persistence records.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
