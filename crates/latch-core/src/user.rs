//! Users and their persistence capabilities

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use latch_persistence::Persistable;
use latch_storage::Database;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let created_str: String = row.get(2)?;
        let created_at = DateTime::parse_from_rfc3339(&created_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Self {
            id: row.get(0)?,
            email: row.get(1)?,
            created_at,
        })
    }
}

impl Persistable for User {
    /// 32 lowercase hex characters
    fn generate_persistence_code(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }

    fn persistable_key(&self) -> &str {
        "user_id"
    }

    fn persistable_id(&self) -> String {
        self.id.clone()
    }

    fn persistable_relationship(&self) -> &str {
        "persistences"
    }
}

pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn create(&self, email: &str) -> Result<User> {
        let email = email.trim();
        if email.is_empty() {
            return Err(CoreError::EmptyEmail);
        }

        let user = User::new(email.to_string());
        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![user.id, user.email, user.created_at.to_rfc3339()],
            )?;
            Ok(())
        })?;

        tracing::info!(user_id = %user.id, "Created user");

        Ok(user)
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = self.db.with_connection(|conn| {
            let user = conn
                .query_row(
                    "SELECT id, email, created_at FROM users WHERE id = ?1",
                    [id],
                    User::from_row,
                )
                .optional()?;
            Ok(user)
        })?;
        Ok(user)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = self.db.with_connection(|conn| {
            let user = conn
                .query_row(
                    "SELECT id, email, created_at FROM users WHERE email = ?1",
                    [email.trim()],
                    User::from_row,
                )
                .optional()?;
            Ok(user)
        })?;
        Ok(user)
    }

    /// Delete a user; their persistence records go with them
    pub fn delete(&self, id: &str) -> Result<()> {
        let deleted = self.db.with_connection(|conn| {
            Ok(conn.execute("DELETE FROM users WHERE id = ?1", [id])?)
        })?;

        if deleted == 0 {
            return Err(CoreError::UserNotFound(id.to_string()));
        }

        tracing::info!(user_id = %id, "Deleted user");

        Ok(())
    }
}

impl Clone for UserRepository {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
