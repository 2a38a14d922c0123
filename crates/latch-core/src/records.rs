//! SQLite-backed persistence records

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row};

use latch_persistence::{Persistence, PersistenceError, PersistenceRecords};
use latch_storage::Database;

use crate::user::User;

const OWNER_KEY: &str = "user_id";
const RELATIONSHIP: &str = "persistences";

pub struct SqlitePersistences {
    db: Database,
}

impl SqlitePersistences {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn check_key(key: &str) -> latch_persistence::Result<()> {
        if key == OWNER_KEY {
            Ok(())
        } else {
            Err(PersistenceError::InvalidKey(key.to_string()))
        }
    }
}

fn parse_time(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn persistence_from_row(row: &Row<'_>) -> rusqlite::Result<Persistence> {
    let created_str: String = row.get(3)?;
    let updated_str: String = row.get(4)?;

    Ok(Persistence {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        code: row.get(2)?,
        created_at: parse_time(&created_str),
        updated_at: parse_time(&updated_str),
    })
}

impl PersistenceRecords for SqlitePersistences {
    type Owner = User;

    fn create(&self, key: &str, owner_id: &str, code: &str) -> latch_persistence::Result<bool> {
        Self::check_key(key)?;

        let now = Utc::now().to_rfc3339();
        let inserted = self.db.with_connection(|conn| {
            Ok(conn.execute(
                "INSERT INTO persistences (user_id, code, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)",
                rusqlite::params![owner_id, code, now],
            )?)
        })?;

        Ok(inserted == 1)
    }

    fn first_by_code(&self, code: &str) -> latch_persistence::Result<Option<Persistence>> {
        let persistence = self.db.with_connection(|conn| {
            let persistence = conn
                .query_row(
                    "SELECT id, user_id, code, created_at, updated_at
                     FROM persistences WHERE code = ?1 LIMIT 1",
                    [code],
                    persistence_from_row,
                )
                .optional()?;
            Ok(persistence)
        })?;
        Ok(persistence)
    }

    fn owner_by_code(&self, code: &str) -> latch_persistence::Result<Option<User>> {
        let user = self.db.with_connection(|conn| {
            let user = conn
                .query_row(
                    "SELECT u.id, u.email, u.created_at
                     FROM persistences p JOIN users u ON u.id = p.user_id
                     WHERE p.code = ?1 LIMIT 1",
                    [code],
                    User::from_row,
                )
                .optional()?;
            Ok(user)
        })?;
        Ok(user)
    }

    fn related(
        &self,
        relationship: &str,
        key: &str,
        owner_id: &str,
    ) -> latch_persistence::Result<Vec<Persistence>> {
        if relationship != RELATIONSHIP {
            return Err(PersistenceError::UnknownRelationship(
                relationship.to_string(),
            ));
        }
        Self::check_key(key)?;

        let persistences = self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, code, created_at, updated_at
                 FROM persistences WHERE user_id = ?1 ORDER BY id",
            )?;
            let persistences = stmt
                .query_map([owner_id], persistence_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(persistences)
        })?;
        Ok(persistences)
    }

    fn delete_by_code(&self, code: &str) -> latch_persistence::Result<usize> {
        let deleted = self.db.with_connection(|conn| {
            Ok(conn.execute("DELETE FROM persistences WHERE code = ?1", [code])?)
        })?;
        Ok(deleted)
    }

    fn delete(&self, persistence: &Persistence) -> latch_persistence::Result<bool> {
        let deleted = self.db.with_connection(|conn| {
            Ok(conn.execute(
                "DELETE FROM persistences WHERE id = ?1",
                [persistence.id],
            )?)
        })?;
        Ok(deleted > 0)
    }
}

impl Clone for SqlitePersistences {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
