//! Client-local durable key/value storage.
//!
//! The console persists its session the way a browser app uses
//! `localStorage`: a handful of fixed string keys holding plain text.
//! There is no versioning and no schema migration.
//!
//! Two backends are provided:
//! - [`FileStorage`] - one file per key under a directory (production)
//! - [`MemoryStorage`] - in-process map (tests)

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Fixed storage keys.
pub mod keys {
    /// Key holding the serialized `{user, isAuthenticated}` pair.
    pub const AUTH: &str = "auth";

    /// Key holding the bare theme string (`light` or `dark`).
    pub const THEME: &str = "theme";
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key contains characters outside `[A-Za-z0-9_-]` or is empty.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Underlying I/O failed.
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored bytes are not valid UTF-8.
    #[error("storage value for key {0} is not valid UTF-8")]
    NotUtf8(String),

    /// Backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A string key/value store that survives process restarts.
///
/// Implementations must be cheap to call from request handlers; all
/// operations are synchronous.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Validate a storage key.
///
/// Keys double as file names, so only a conservative alphabet is allowed.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key(keys::AUTH).is_ok());
        assert!(validate_key(keys::THEME).is_ok());
        assert!(validate_key("table_prefs-2").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key("../auth").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("auth.json").is_err());
    }
}
