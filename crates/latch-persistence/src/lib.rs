//! Latch Persistence
//!
//! Keeps an authenticated principal logged in across requests:
//! - A persistence code is issued per login and written to the session
//! - "Remember me" logins also write the code to a cookie
//! - A record links each code to its owner so later requests can re-authenticate
//! - Single session mode drops a principal's older codes on every login

mod config;
mod error;
mod persistable;
mod repository;
mod store;

pub use config::PersistenceConfig;
pub use error::PersistenceError;
pub use persistable::{Persistable, Persistence, PersistenceRecords};
pub use repository::PersistenceRepository;
pub use store::{CodeStore, MemoryStore};

pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Shortened form of a code that is safe to put in logs.
///
/// At most the first six characters are kept, and never the whole code.
pub(crate) fn redact(code: &str) -> String {
    let len = code.chars().count();
    let shown = 6.min(len / 2);
    let mut out: String = code.chars().take(shown).collect();
    out.push('…');
    out
}
