//! CLI command implementations.

pub mod session;
pub mod theme;
pub mod users;

use std::sync::Arc;

use thiserror::Error;

use elmis_admin::config::{AdminConfig, ConfigError};
use elmis_admin::services::{AuthError, UserDirectory};
use elmis_admin::session::SessionStore;
use elmis_admin::state::load_directory;
use elmis_admin::storage::FileStorage;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Users file could not be loaded, or sign-in was rejected.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Session could not be printed as JSON.
    #[error("Failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Everything a command needs: the session store over the configured
/// storage directory and the user directory.
pub struct Context {
    pub config: AdminConfig,
    pub sessions: SessionStore,
    pub directory: UserDirectory,
}

impl Context {
    /// Load configuration from the environment and open the store.
    ///
    /// # Errors
    ///
    /// Returns `CliError` if configuration or the users file is invalid.
    pub fn from_env() -> Result<Self, CliError> {
        Self::new(AdminConfig::from_env()?)
    }

    /// Open the store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `CliError` if the configured users file cannot be loaded.
    pub fn new(config: AdminConfig) -> Result<Self, CliError> {
        let directory = load_directory(&config)?;
        let sessions = SessionStore::open(Arc::new(FileStorage::new(&config.storage_dir)));
        tracing::debug!(storage_dir = %config.storage_dir.display(), "Opened session storage");
        Ok(Self {
            config,
            sessions,
            directory,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use std::path::Path;

    use super::*;

    /// Context over a storage directory, with built-in users.
    pub fn context(dir: &Path) -> Context {
        let dir = dir.display().to_string();
        let config = AdminConfig::from_vars(|key| (key == "ELMIS_STORAGE_DIR").then(|| dir.clone()))
            .unwrap();
        Context::new(config).unwrap()
    }
}
