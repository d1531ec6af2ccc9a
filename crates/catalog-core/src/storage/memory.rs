use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{StorageError, TokenStorage};

/// In-process storage. Clones share the same map, which lets tests
/// simulate a restart by handing a clone to a fresh session store.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.set("auth_token", "xyz").unwrap();
        assert_eq!(b.get("auth_token").unwrap().as_deref(), Some("xyz"));
        b.remove("auth_token").unwrap();
        assert_eq!(a.get("auth_token").unwrap(), None);
    }
}
