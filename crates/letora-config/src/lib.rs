//! Configuration, platform paths, and credential persistence for the
//! Letora client.
//!
//! Settings load from a TOML file layered under `LETORA_`-prefixed
//! environment variables. Session tokens live in the OS keychain, with
//! an environment-variable override for headless use.

pub mod tokens;

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use letora_api::{ApiClient, TlsMode, TransportConfig};
use letora_core::{FileStorage, Session};

pub use tokens::{clear_tokens, load_tokens, store_tokens};

const ENV_PREFIX: &str = "LETORA_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("could not determine platform directories")]
    MissingProjectDirs,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] letora_api::Error),

    #[error("draft storage: {0}")]
    Storage(#[from] letora_core::StorageError),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application settings, all overridable via `LETORA_*` env vars.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend base URL.
    pub api_url: Url,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    /// Skip TLS verification (staging backends with self-signed certs).
    pub accept_invalid_certs: bool,
    /// Override for the draft/data directory. Defaults to the platform
    /// data dir.
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            // Infallible: literal URL.
            #[allow(clippy::unwrap_used)]
            api_url: Url::parse("https://api.letora.app/").unwrap(),
            timeout_secs: 30,
            accept_invalid_certs: false,
            data_dir: None,
        }
    }
}

impl AppConfig {
    /// Load config: built-in defaults, then the config file (if any),
    /// then `LETORA_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = config_path() {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| ConfigError::Figment(Box::new(e)))
    }

    /// Write this config to the platform config file, creating parent
    /// directories as needed.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = config_path().ok_or(ConfigError::MissingProjectDirs)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(path)
    }

    /// Transport settings for [`letora_api::ApiClient`].
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: if self.accept_invalid_certs {
                TlsMode::DangerAcceptInvalid
            } else {
                TlsMode::System
            },
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    /// Directory for drafts and other local data.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_local_dir().to_path_buf())
            .ok_or(ConfigError::MissingProjectDirs)
    }

    /// Build a ready-to-use [`Session`]: API client from this config,
    /// drafts persisted under the data directory. Stored tokens, if
    /// any, are installed but not validated here.
    pub fn build_session(&self) -> Result<Session, ConfigError> {
        let api = ApiClient::new(self.api_url.as_str(), &self.transport())?;
        if let Some(stored) = tokens::load_tokens()? {
            api.set_tokens(stored);
        }

        let storage = FileStorage::new(self.resolve_data_dir()?.join("drafts"))?;
        Ok(Session::new(api, std::sync::Arc::new(storage)))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "letora", "letora")
}

/// Path of the TOML config file, if platform directories resolve.
pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}
