//! Typed JSON view over one key of the secure store

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::result::Result;
use crate::ports::SecureStore;

/// One JSON document stored under a fixed key
pub struct PersistedEntry<T> {
    store: Arc<dyn SecureStore>,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PersistedEntry<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn SecureStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Read and decode the entry. `Ok(None)` when the key is absent.
    pub fn load(&self) -> Result<Option<T>> {
        match self.store.get_item(self.key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encode and write the whole value
    pub fn save(&self, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set_item(self.key, &raw)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.delete_item(self.key)
    }
}
