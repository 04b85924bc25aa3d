//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ELMIS_HOST` - Bind address (default: 127.0.0.1)
//! - `ELMIS_PORT` - Listen port (default: 3001)
//! - `ELMIS_STORAGE_DIR` - Directory holding the persisted session (default: .elmis)
//! - `ELMIS_BACKEND_URL` - Base URL of the REST backend (default: <http://localhost:8080>)
//! - `ELMIS_BACKEND_TOKEN` - Bearer token sent to the backend
//! - `ELMIS_DEMO_PASSWORD` - Password accepted for every known user (default: password)
//! - `ELMIS_USERS_FILE` - YAML file replacing the built-in users
//! - `ELMIS_LOG_JSON` - Emit JSON logs when set to anything but `0`/`false`
//!
//! ## Sentry
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::services::auth::DEFAULT_DEMO_PASSWORD;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "3001";
const DEFAULT_STORAGE_DIR: &str = ".elmis";
const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Console configuration.
#[derive(Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory backing the durable session storage
    pub storage_dir: PathBuf,
    /// REST backend configuration
    pub backend: BackendConfig,
    /// Password accepted for every known user
    pub demo_password: SecretString,
    /// Optional YAML users file
    pub users_file: Option<PathBuf>,
    /// Emit JSON logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("storage_dir", &self.storage_dir)
            .field("backend", &self.backend)
            .field("demo_password", &"[REDACTED]")
            .field("users_file", &self.users_file)
            .field("log_json", &self.log_json)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish_non_exhaustive()
    }
}

/// REST backend configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL that endpoint paths are joined onto
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl BackendConfig {
    fn from_vars(vars: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw = get_env_or_default(vars, "ELMIS_BACKEND_URL", DEFAULT_BACKEND_URL);
        let base_url = Url::parse(&raw).map_err(|e| {
            ConfigError::InvalidEnvVar("ELMIS_BACKEND_URL".to_string(), e.to_string())
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "ELMIS_BACKEND_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            token: get_optional_env(vars, "ELMIS_BACKEND_TOKEN").map(SecretString::from),
        })
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_vars(vars: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = get_env_or_default(&vars, "ELMIS_HOST", DEFAULT_HOST)
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ELMIS_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default(&vars, "ELMIS_PORT", DEFAULT_PORT)
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ELMIS_PORT".to_string(), e.to_string()))?;
        let storage_dir =
            PathBuf::from(get_env_or_default(&vars, "ELMIS_STORAGE_DIR", DEFAULT_STORAGE_DIR));
        let backend = BackendConfig::from_vars(&vars)?;
        let demo_password = SecretString::from(get_env_or_default(
            &vars,
            "ELMIS_DEMO_PASSWORD",
            DEFAULT_DEMO_PASSWORD,
        ));
        let users_file = get_optional_env(&vars, "ELMIS_USERS_FILE").map(PathBuf::from);
        let log_json = get_optional_env(&vars, "ELMIS_LOG_JSON")
            .is_some_and(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false"));

        let sentry_dsn = get_optional_env(&vars, "SENTRY_DSN");
        let sentry_environment = get_optional_env(&vars, "SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_rate(&vars, "SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = get_rate(&vars, "SENTRY_TRACES_SAMPLE_RATE", 0.0)?;

        Ok(Self {
            host,
            port,
            storage_dir,
            backend,
            demo_password,
            users_file,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating empty values as unset.
fn get_optional_env(vars: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    vars(key).filter(|v| !v.trim().is_empty())
}

/// Get a variable with a default value.
fn get_env_or_default(vars: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(vars, key).unwrap_or_else(|| default.to_string())
}

/// Get a sample rate in `0.0..=1.0`.
fn get_rate(
    vars: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: f32,
) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(vars, key) else {
        return Ok(default);
    };
    let rate = raw
        .trim()
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be between 0.0 and 1.0".to_string(),
        ));
    }
    Ok(rate)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AdminConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AdminConfig::from_vars(move |key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.storage_dir, PathBuf::from(".elmis"));
        assert_eq!(config.backend.base_url.as_str(), "http://localhost:8080/");
        assert!(config.backend.token.is_none());
        assert_eq!(config.demo_password.expose_secret(), "password");
        assert!(config.users_file.is_none());
        assert!(!config.log_json);
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("ELMIS_HOST", "0.0.0.0"),
            ("ELMIS_PORT", "8081"),
            ("ELMIS_STORAGE_DIR", "/var/lib/elmis"),
            ("ELMIS_BACKEND_URL", "https://library.example.org/"),
            ("ELMIS_BACKEND_TOKEN", "tok_abc"),
            ("ELMIS_USERS_FILE", "users.yaml"),
            ("ELMIS_LOG_JSON", "1"),
            ("SENTRY_TRACES_SAMPLE_RATE", "0.25"),
        ])
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8081");
        assert_eq!(config.storage_dir, PathBuf::from("/var/lib/elmis"));
        assert_eq!(config.backend.base_url.host_str(), Some("library.example.org"));
        assert_eq!(
            config.backend.token.as_ref().unwrap().expose_secret(),
            "tok_abc"
        );
        assert_eq!(config.users_file, Some(PathBuf::from("users.yaml")));
        assert!(config.log_json);
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = config_from(&[("ELMIS_BACKEND_TOKEN", ""), ("ELMIS_PORT", " ")]).unwrap();
        assert!(config.backend.token.is_none());
        assert_eq!(config.port, 3001);
    }

    #[test]
    fn test_log_json_false() {
        assert!(!config_from(&[("ELMIS_LOG_JSON", "false")]).unwrap().log_json);
        assert!(!config_from(&[("ELMIS_LOG_JSON", "0")]).unwrap().log_json);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("ELMIS_PORT", "99999")]),
            Err(ConfigError::InvalidEnvVar(var, _)) if var == "ELMIS_PORT"
        ));
        assert!(matches!(
            config_from(&[("ELMIS_HOST", "localhost")]),
            Err(ConfigError::InvalidEnvVar(var, _)) if var == "ELMIS_HOST"
        ));
        assert!(matches!(
            config_from(&[("ELMIS_BACKEND_URL", "mailto:x@y.z")]),
            Err(ConfigError::InvalidEnvVar(var, _)) if var == "ELMIS_BACKEND_URL"
        ));
        assert!(matches!(
            config_from(&[("SENTRY_SAMPLE_RATE", "2")]),
            Err(ConfigError::InvalidEnvVar(var, _)) if var == "SENTRY_SAMPLE_RATE"
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = config_from(&[
            ("ELMIS_BACKEND_TOKEN", "super_secret_token"),
            ("ELMIS_DEMO_PASSWORD", "super_secret_password"),
        ])
        .unwrap();

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("localhost:8080"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token"));
        assert!(!debug_output.contains("super_secret_password"));
    }
}
