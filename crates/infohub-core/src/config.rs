//! # Configuration
//!
//! Load and save hub settings to/from disk.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::PersistenceError;

/// Raw-content origin the page fragments are published under.
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/LexyGuru/Warframe_Api_Main/main/";

/// jQuery build loaded ahead of every page script.
pub const DEFAULT_JQUERY_URL: &str = "https://code.jquery.com/jquery-3.6.0.min.js";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Base URL every resource path is appended to.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Verify TLS certificates.
    ///
    /// Turning this off is an explicit opt-out and is logged on every start.
    pub verify_tls: bool,

    /// Script library URL; page scripts are written against jQuery.
    pub jquery_url: String,

    /// Embedded bridge bootstrap settings.
    pub bridge: BridgeSettings,
}

/// Timing of the embedded bridge bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Milliseconds between checks for the bridge transport.
    pub poll_interval_ms: u32,

    /// Checks made before the document reports a bridge timeout.
    pub max_attempts: u32,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            verify_tls: true,
            jquery_url: DEFAULT_JQUERY_URL.to_string(),
            bridge: BridgeSettings::default(),
        }
    }
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            max_attempts: 100,
        }
    }
}

impl HubConfig {
    /// Loads configuration from `path`, or returns defaults if it is absent
    /// or unreadable.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!(?path, "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(?path, error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(?path, error = %e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Saves configuration to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the file cannot be serialized or written.
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents).map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(?path, "Saved configuration");
        Ok(())
    }
}
