//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::AdminConfig;
use crate::services::{AuthError, UserDirectory};
use crate::session::SessionStore;
use crate::storage::{FileStorage, Storage};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the one process-wide session store,
/// so every request observes the same signed-in user and theme.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    sessions: SessionStore,
    directory: UserDirectory,
    backend: BackendClient,
}

impl AppState {
    /// Create state from already-built parts.
    #[must_use]
    pub fn new(config: AdminConfig, sessions: SessionStore, directory: UserDirectory) -> Self {
        let backend = BackendClient::new(&config.backend);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                sessions,
                directory,
                backend,
            }),
        }
    }

    /// Create state from configuration: file storage under the configured
    /// directory and the configured (or built-in) user directory.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if a users file is configured but cannot be loaded.
    pub fn from_config(config: AdminConfig) -> Result<Self, AuthError> {
        let directory = load_directory(&config)?;
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(&config.storage_dir));
        let sessions = SessionStore::open(storage);
        Ok(Self::new(config, sessions, directory))
    }

    /// Get a reference to the console configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Get a reference to the user directory.
    #[must_use]
    pub fn directory(&self) -> &UserDirectory {
        &self.inner.directory
    }

    /// Get a reference to the REST backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }
}

/// Load the users file if configured, otherwise the built-in users.
///
/// # Errors
///
/// Returns `AuthError` if the configured users file cannot be loaded.
pub fn load_directory(config: &AdminConfig) -> Result<UserDirectory, AuthError> {
    let password = config.demo_password.clone();
    match &config.users_file {
        Some(path) => UserDirectory::from_yaml_file(path, password),
        None => Ok(UserDirectory::builtin(password)),
    }
}
