//! Principal and record store contracts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

/// A stored link between a persistence code and its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persistence {
    pub id: i64,
    pub owner_id: String,
    /// Opaque, unique across all owners
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An authenticated principal that can be kept logged in.
pub trait Persistable {
    /// A fresh, unguessable code for a new login
    fn generate_persistence_code(&self) -> String;

    /// Column on the persistence record referencing the principal
    fn persistable_key(&self) -> &str;

    fn persistable_id(&self) -> String;

    /// Name of the relation yielding this principal's persistence records
    fn persistable_relationship(&self) -> &str;
}

/// Backing store for persistence records.
///
/// Lookups report absence as `None`; anything else the store cannot handle
/// (unknown key columns, unknown relationships, storage failures) is an error.
pub trait PersistenceRecords {
    type Owner;

    /// Save a new record. Returns whether the store accepted it.
    fn create(&self, key: &str, owner_id: &str, code: &str) -> Result<bool>;

    fn first_by_code(&self, code: &str) -> Result<Option<Persistence>>;

    fn owner_by_code(&self, code: &str) -> Result<Option<Self::Owner>>;

    /// Records reachable from an owner through `relationship`
    fn related(&self, relationship: &str, key: &str, owner_id: &str)
        -> Result<Vec<Persistence>>;

    /// Delete every record carrying `code`, returning how many went
    fn delete_by_code(&self, code: &str) -> Result<usize>;

    fn delete(&self, persistence: &Persistence) -> Result<bool>;
}
