//! Latch Core
//!
//! Wires the persistence repository to SQLite-backed users and records, and
//! exposes a request-scoped [`Guard`] for login, check and logout.

mod config;
mod error;
mod guard;
mod latch;
mod records;
mod user;

pub use config::Config;
pub use error::CoreError;
pub use guard::Guard;
pub use latch::Latch;
pub use records::SqlitePersistences;
pub use user::{User, UserRepository};

pub use latch_persistence::{
    CodeStore, MemoryStore, Persistable, Persistence, PersistenceConfig, PersistenceError,
    PersistenceRecords, PersistenceRepository,
};
pub use latch_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
