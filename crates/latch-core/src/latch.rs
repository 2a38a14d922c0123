//! Entry point holding the database and configuration

use latch_persistence::{CodeStore, MemoryStore, PersistenceRepository};
use latch_storage::Database;

use crate::config::Config;
use crate::guard::Guard;
use crate::records::SqlitePersistences;
use crate::user::UserRepository;
use crate::Result;

pub struct Latch {
    config: Config,
    db: Database,
    users: UserRepository,
}

impl Latch {
    pub fn new(config: Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Ok(Self::with_database(config, db))
    }

    pub fn with_database(config: Config, db: Database) -> Self {
        let users = UserRepository::new(db.clone());

        tracing::info!(single = config.persistence.single, "Latch initialized");

        Self { config, db, users }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// A guard over the caller's session and cookie stores
    pub fn guard<S: CodeStore, C: CodeStore>(&self, session: S, cookie: C) -> Guard<S, C> {
        let repository = PersistenceRepository::new(
            session,
            cookie,
            SqlitePersistences::new(self.db.clone()),
            self.config.persistence.single,
        );
        Guard::new(repository)
    }

    /// A guard over one in-memory bag, keyed by the configured names
    pub fn memory_guard(&self, bag: &MemoryStore) -> Guard<MemoryStore, MemoryStore> {
        let session = bag.sibling(self.config.persistence.session_key.clone());
        let cookie = bag.sibling(self.config.persistence.cookie_name.clone());
        self.guard(session, cookie)
    }
}
