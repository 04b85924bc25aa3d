//! In-memory storage.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{Storage, StorageError, validate_key};

/// `HashMap`-backed storage that lives as long as the value.
///
/// [`MemoryStorage::failing`] builds an instance whose every operation
/// errors, for exercising the session store's failure handling.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
    failing: bool,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with `items`.
    #[must_use]
    pub fn with_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: RwLock::new(
                items
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            failing: false,
        }
    }

    /// Create a storage that rejects every read and write.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            items: RwLock::default(),
            failing: true,
        }
    }

    fn check(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        if self.failing {
            return Err(StorageError::Unavailable("storage disabled".to_string()));
        }
        Ok(())
    }
}

fn poisoned() -> StorageError {
    StorageError::Unavailable("Lock poisoned".to_string())
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check(key)?;
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check(key)?;
        self.items
            .write()
            .map_err(|_| poisoned())?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check(key)?;
        self.items.write().map_err(|_| poisoned())?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::keys;

    #[test]
    fn test_with_items() {
        let storage = MemoryStorage::with_items([(keys::THEME, "light")]);
        assert_eq!(storage.get_item(keys::THEME).unwrap().as_deref(), Some("light"));
        assert_eq!(storage.get_item(keys::AUTH).unwrap(), None);
    }

    #[test]
    fn test_failing_rejects_everything() {
        let storage = MemoryStorage::failing();
        assert!(storage.get_item(keys::AUTH).is_err());
        assert!(storage.set_item(keys::AUTH, "{}").is_err());
        assert!(storage.remove_item(keys::AUTH).is_err());
    }
}
