//! Persistence Repository
//!
//! Issues persistence codes, keeps them in the session (and cookie for
//! remembered logins) and records which owner each code belongs to.

use crate::persistable::{Persistable, Persistence, PersistenceRecords};
use crate::store::CodeStore;
use crate::{redact, Result};

pub struct PersistenceRepository<S, C, R> {
    /// Keep only the newest code per principal
    single: bool,
    session: S,
    cookie: C,
    records: R,
}

impl<S, C, R> PersistenceRepository<S, C, R>
where
    S: CodeStore,
    C: CodeStore,
    R: PersistenceRecords,
{
    pub fn new(session: S, cookie: C, records: R, single: bool) -> Self {
        Self {
            single,
            session,
            cookie,
            records,
        }
    }

    pub fn is_single(&self) -> bool {
        self.single
    }

    pub fn records(&self) -> &R {
        &self.records
    }

    /// Swap the record store used for all later operations
    pub fn set_records(&mut self, records: R) {
        self.records = records;
    }

    /// Current persistence code, session first, then cookie
    pub fn check(&self) -> Option<String> {
        self.session.get().or_else(|| self.cookie.get())
    }

    pub fn find_by_persistence_code(&self, code: &str) -> Result<Option<Persistence>> {
        let persistence = self.records.first_by_code(code)?;
        tracing::debug!(
            code = %redact(code),
            found = persistence.is_some(),
            "Looked up persistence"
        );
        Ok(persistence)
    }

    pub fn find_user_by_persistence_code(&self, code: &str) -> Result<Option<R::Owner>> {
        let owner = self.records.owner_by_code(code)?;
        tracing::debug!(
            code = %redact(code),
            found = owner.is_some(),
            "Looked up persistence owner"
        );
        Ok(owner)
    }

    /// Issue a new code for `persistable` and record it.
    ///
    /// Returns what the record store reports for the save. Session and cookie
    /// writes are not undone when the save fails.
    pub fn persist<P: Persistable>(&self, persistable: &P, remember: bool) -> Result<bool> {
        if self.single {
            self.flush(persistable, true)?;
        }

        let code = persistable.generate_persistence_code();

        self.session.put(&code);

        if remember {
            self.cookie.put(&code);
        }

        let owner_id = persistable.persistable_id();
        let saved = self
            .records
            .create(persistable.persistable_key(), &owner_id, &code)?;

        tracing::info!(
            owner_id = %owner_id,
            code = %redact(&code),
            remember,
            saved,
            "Persisted login"
        );

        Ok(saved)
    }

    pub fn persist_and_remember<P: Persistable>(&self, persistable: &P) -> Result<bool> {
        self.persist(persistable, true)
    }

    /// Drop the current code from session, cookie and record store.
    ///
    /// Returns `None` without touching anything when no code is set.
    pub fn forget(&self) -> Result<Option<usize>> {
        let Some(code) = self.check() else {
            return Ok(None);
        };

        self.session.forget();
        self.cookie.forget();

        let deleted = self.remove(&code)?;
        tracing::info!(code = %redact(&code), deleted, "Forgot persistence");

        Ok(Some(deleted))
    }

    pub fn remove(&self, code: &str) -> Result<usize> {
        self.records.delete_by_code(code)
    }

    /// Delete every record of `persistable` except the current one.
    ///
    /// With `forget`, the caller's own session is forgotten first, whichever
    /// principal is being flushed, so nothing survives.
    pub fn flush<P: Persistable>(&self, persistable: &P, forget: bool) -> Result<usize> {
        if forget {
            self.forget()?;
        }

        let owner_id = persistable.persistable_id();
        let persistences = self.records.related(
            persistable.persistable_relationship(),
            persistable.persistable_key(),
            &owner_id,
        )?;

        let current = self.check();
        let mut deleted = 0;
        for persistence in persistences
            .iter()
            .filter(|p| current.as_deref() != Some(p.code.as_str()))
        {
            if self.records.delete(persistence)? {
                deleted += 1;
            }
        }

        tracing::info!(owner_id = %owner_id, forget, deleted, "Flushed persistences");

        Ok(deleted)
    }
}
