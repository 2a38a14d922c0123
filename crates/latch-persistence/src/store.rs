//! Session and cookie storage for the current persistence code

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// A single slot holding the persistence code for the current request.
///
/// Both the session and the cookie side of the repository speak this
/// interface; the transport behind it (server session, HTTP cookie) is up to
/// the implementor.
pub trait CodeStore {
    fn get(&self) -> Option<String>;
    fn put(&self, code: &str);
    fn forget(&self);
}

/// In-memory [`CodeStore`] addressing one key of a shared map.
///
/// Clones share the same map, so a session and a cookie store can live in one
/// request bag under different keys.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    key: String,
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            slots: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Another store over the same map, under a different key
    pub fn sibling(&self, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            slots: Arc::clone(&self.slots),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl CodeStore for MemoryStore {
    fn get(&self) -> Option<String> {
        self.slots
            .read()
            .get(&self.key)
            .filter(|code| !code.is_empty())
            .cloned()
    }

    fn put(&self, code: &str) {
        self.slots.write().insert(self.key.clone(), code.to_string());
    }

    fn forget(&self) {
        self.slots.write().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_forget() {
        let store = MemoryStore::new("session");
        assert_eq!(store.get(), None);

        store.put("abc");
        assert_eq!(store.get().as_deref(), Some("abc"));

        store.forget();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_siblings_share_map_but_not_slot() {
        let session = MemoryStore::new("session");
        let cookie = session.sibling("cookie");

        session.put("one");
        assert_eq!(cookie.get(), None);

        cookie.put("two");
        session.forget();
        assert_eq!(cookie.get().as_deref(), Some("two"));
        assert_eq!(cookie.key(), "cookie");
    }

    #[test]
    fn test_empty_code_reads_as_absent() {
        let store = MemoryStore::new("session");
        store.put("");
        assert_eq!(store.get(), None);
    }
}
