//! In-memory secure store for tests and embedding

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::result::{Error, Result};
use crate::ports::SecureStore;

/// `HashMap`-backed [`SecureStore`]. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemorySecureStore {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySecureStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SecureStore for MemorySecureStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_item(&self, key: &str) -> Result<()> {
        self.items()?.remove(key);
        Ok(())
    }
}

/// Store whose writes always fail; reads serve the wrapped map
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct FailingSecureStore {
    pub inner: MemorySecureStore,
}

#[cfg(test)]
impl SecureStore for FailingSecureStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::storage("disk full"))
    }

    fn delete_item(&self, _key: &str) -> Result<()> {
        Err(Error::storage("disk full"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let store = MemorySecureStore::new();
        let other = store.clone();

        store.set_item("user", "{}").unwrap();
        assert_eq!(other.get_item("user").unwrap().as_deref(), Some("{}"));
        assert_eq!(other.len(), 1);

        other.delete_item("user").unwrap();
        assert!(store.is_empty());
        assert_eq!(store.get_item("user").unwrap(), None);
    }
}
