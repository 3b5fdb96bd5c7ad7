//! Store configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use blocked_numbers::domain::{BlocklistConfig, StorageBackend};
//!
//! let config = BlocklistConfig::default()
//!     .with_fallback_country("GB")
//!     .with_storage(StorageBackend::file("/var/lib/blocklist/blocked.db"));
//! config.validate()?;
//! ```

use super::country;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default per-observer notification buffer.
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = blocklist_bus::DEFAULT_CHANNEL_CAPACITY;

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown fallback country: {0}")]
    UnknownCountry(String),

    #[error("Notification capacity must be greater than zero")]
    ZeroNotificationCapacity,

    #[error("Store path must not be empty")]
    EmptyStorePath,

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Where records are persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process memory only; lost on exit.
    InMemory,
    /// Snapshot file on disk.
    File { path: PathBuf },
}

impl StorageBackend {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        StorageBackend::File { path: path.into() }
    }
}

/// Blocked number store configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlocklistConfig {
    /// Region used when the country detector reports nothing
    pub fallback_country_iso: Option<String>,
    /// Pending notifications buffered per observer
    pub notification_capacity: usize,
    /// Persistence backend
    pub storage: StorageBackend,
}

impl Default for BlocklistConfig {
    fn default() -> Self {
        Self {
            fallback_country_iso: None,
            notification_capacity: DEFAULT_NOTIFICATION_CAPACITY,
            storage: StorageBackend::InMemory,
        }
    }
}

impl BlocklistConfig {
    /// Build configuration from environment variables.
    ///
    /// - `BLOCKLIST_FALLBACK_COUNTRY`: ISO region used when detection fails
    /// - `BLOCKLIST_NOTIFY_CAPACITY`: per-observer buffer (default 64)
    /// - `BLOCKLIST_STORE_PATH`: file-backed store at this path (default: in memory)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(iso) = env::var("BLOCKLIST_FALLBACK_COUNTRY") {
            if !iso.trim().is_empty() {
                config.fallback_country_iso = Some(iso.trim().to_ascii_uppercase());
            }
        }

        if let Ok(raw) = env::var("BLOCKLIST_NOTIFY_CAPACITY") {
            config.notification_capacity =
                raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    var: "BLOCKLIST_NOTIFY_CAPACITY",
                    value: raw.clone(),
                })?;
        }

        if let Ok(path) = env::var("BLOCKLIST_STORE_PATH") {
            config.storage = StorageBackend::file(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(iso) = &self.fallback_country_iso {
            if !country::is_known(iso) {
                return Err(ConfigError::UnknownCountry(iso.clone()));
            }
        }

        if self.notification_capacity == 0 {
            return Err(ConfigError::ZeroNotificationCapacity);
        }

        if let StorageBackend::File { path } = &self.storage {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyStorePath);
            }
        }

        Ok(())
    }

    /// Builder-style method to set the fallback country
    pub fn with_fallback_country(mut self, iso: impl Into<String>) -> Self {
        self.fallback_country_iso = Some(iso.into());
        self
    }

    /// Builder-style method to set the notification capacity
    pub fn with_notification_capacity(mut self, capacity: usize) -> Self {
        self.notification_capacity = capacity;
        self
    }

    /// Builder-style method to set the storage backend
    pub fn with_storage(mut self, storage: StorageBackend) -> Self {
        self.storage = storage;
        self
    }
}
