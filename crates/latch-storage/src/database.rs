//! Database connection and operations

use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

use crate::migrations::run_migrations;
use crate::Result;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;

        // Persistence rows cascade with their owning user
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let _: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        run_migrations(&conn)?;

        tracing::info!(path = %path.as_ref().display(), "Opened database");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(db: &Database, table: &str) -> i64 {
        db.with_connection(|conn| {
            let count =
                conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
            Ok(count)
        })
        .unwrap()
    }

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(count(&db, "users"), 0);
        assert_eq!(count(&db, "persistences"), 0);
    }

    #[test]
    fn test_persistences_cascade_with_user() {
        let db = Database::open_in_memory().unwrap();
        db.transaction(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, created_at) VALUES ('u1', 'a@example.com', 'now')",
                [],
            )?;
            conn.execute(
                "INSERT INTO persistences (user_id, code, created_at, updated_at)
                 VALUES ('u1', 'abc', 'now', 'now')",
                [],
            )?;
            Ok(())
        })
        .unwrap();
        assert_eq!(count(&db, "persistences"), 1);

        db.with_connection(|conn| {
            conn.execute("DELETE FROM users WHERE id = 'u1'", [])?;
            Ok(())
        })
        .unwrap();
        assert_eq!(count(&db, "persistences"), 0);
    }

    #[test]
    fn test_code_is_unique() {
        let db = Database::open_in_memory().unwrap();
        let result = db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, created_at) VALUES ('u1', 'a@example.com', 'now')",
                [],
            )?;
            for _ in 0..2 {
                conn.execute(
                    "INSERT INTO persistences (user_id, code, created_at, updated_at)
                     VALUES ('u1', 'same', 'now', 'now')",
                    [],
                )?;
            }
            Ok(())
        });
        assert!(result.is_err());
    }
}
