//! Request-scoped login state

use parking_lot::RwLock;

use latch_persistence::{CodeStore, PersistenceRecords, PersistenceRepository};

use crate::records::SqlitePersistences;
use crate::user::User;
use crate::Result;

/// Login, check and logout for one request's session and cookie.
pub struct Guard<S, C, R = SqlitePersistences> {
    persistences: PersistenceRepository<S, C, R>,
    /// User resolved during this request
    user: RwLock<Option<User>>,
}

impl<S, C, R> Guard<S, C, R>
where
    S: CodeStore,
    C: CodeStore,
    R: PersistenceRecords<Owner = User>,
{
    pub fn new(persistences: PersistenceRepository<S, C, R>) -> Self {
        Self {
            persistences,
            user: RwLock::new(None),
        }
    }

    pub fn persistences(&self) -> &PersistenceRepository<S, C, R> {
        &self.persistences
    }

    /// Persist a login for `user`; only a stored login is remembered here
    pub fn login(&self, user: &User, remember: bool) -> Result<bool> {
        let saved = self.persistences.persist(user, remember)?;

        if saved {
            *self.user.write() = Some(user.clone());
            tracing::info!(user_id = %user.id, remember, "Logged in");
        } else {
            tracing::warn!(user_id = %user.id, remember, "Login was not stored");
        }

        Ok(saved)
    }

    pub fn login_and_remember(&self, user: &User) -> Result<bool> {
        self.login(user, true)
    }

    /// The logged in user, resolved from the session or cookie code
    pub fn check(&self) -> Result<Option<User>> {
        if let Some(user) = self.user.read().clone() {
            return Ok(Some(user));
        }

        let Some(code) = self.persistences.check() else {
            return Ok(None);
        };

        let user = self.persistences.find_user_by_persistence_code(&code)?;
        if let Some(user) = &user {
            *self.user.write() = Some(user.clone());
        }

        Ok(user)
    }

    /// Log out this request, or every session of the user with `everywhere`
    pub fn logout(&self, everywhere: bool) -> Result<()> {
        let user = self.check()?;

        match (&user, everywhere) {
            (Some(user), true) => {
                self.persistences.flush(user, true)?;
            }
            _ => {
                self.persistences.forget()?;
            }
        }

        *self.user.write() = None;

        if let Some(user) = user {
            tracing::info!(user_id = %user.id, everywhere, "Logged out");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::UserRepository;
    use latch_persistence::{MemoryStore, Persistence};
    use latch_storage::Database;

    /// SQLite records whose saves are never stored
    struct RejectingRecords(SqlitePersistences);

    impl PersistenceRecords for RejectingRecords {
        type Owner = User;

        fn create(
            &self,
            _key: &str,
            _owner_id: &str,
            _code: &str,
        ) -> latch_persistence::Result<bool> {
            Ok(false)
        }

        fn first_by_code(&self, code: &str) -> latch_persistence::Result<Option<Persistence>> {
            self.0.first_by_code(code)
        }

        fn owner_by_code(&self, code: &str) -> latch_persistence::Result<Option<User>> {
            self.0.owner_by_code(code)
        }

        fn related(
            &self,
            relationship: &str,
            key: &str,
            owner_id: &str,
        ) -> latch_persistence::Result<Vec<Persistence>> {
            self.0.related(relationship, key, owner_id)
        }

        fn delete_by_code(&self, code: &str) -> latch_persistence::Result<usize> {
            self.0.delete_by_code(code)
        }

        fn delete(&self, persistence: &Persistence) -> latch_persistence::Result<bool> {
            self.0.delete(persistence)
        }
    }

    #[test]
    fn test_unstored_login_is_not_cached() {
        let db = Database::open_in_memory().unwrap();
        let alice = UserRepository::new(db.clone())
            .create("alice@example.com")
            .unwrap();

        let session = MemoryStore::new("session");
        let cookie = session.sibling("cookie");
        let guard = Guard::new(PersistenceRepository::new(
            session.clone(),
            cookie,
            RejectingRecords(SqlitePersistences::new(db)),
            false,
        ));

        assert!(!guard.login(&alice, false).unwrap());

        // The code stays in the session but resolves to nobody
        assert!(session.get().is_some());
        assert_eq!(guard.check().unwrap(), None);
    }

    #[test]
    fn test_stored_login_is_cached() {
        let db = Database::open_in_memory().unwrap();
        let alice = UserRepository::new(db.clone())
            .create("alice@example.com")
            .unwrap();

        let session = MemoryStore::new("session");
        let cookie = session.sibling("cookie");
        let guard: Guard<_, _> = Guard::new(PersistenceRepository::new(
            session.clone(),
            cookie,
            SqlitePersistences::new(db),
            false,
        ));

        assert!(guard.login(&alice, false).unwrap());

        // Cached even after the session slot is cleared
        session.forget();
        assert_eq!(guard.check().unwrap(), Some(alice));
    }
}
