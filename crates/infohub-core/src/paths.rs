//! # Application Paths
//!
//! Resolves and prepares the per-user directories the hub writes to.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StartupError;

/// Directory name used under the platform config and cache roots.
pub const APP_DIR_NAME: &str = "WarframeInfoHub";

/// Per-user directories for configuration and cached data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    config_dir: PathBuf,
    cache_dir: PathBuf,
}

impl AppPaths {
    /// Resolves the platform directories and creates them.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError`] if a directory cannot be determined or
    /// created. This is fatal to startup.
    pub fn discover() -> Result<Self, StartupError> {
        let config_root = dirs::config_dir().ok_or(StartupError::MissingDirectory("config"))?;
        let cache_root = dirs::cache_dir().ok_or(StartupError::MissingDirectory("cache"))?;
        Self::prepare(config_root.join(APP_DIR_NAME), cache_root.join(APP_DIR_NAME))
    }

    /// Uses explicit directories, creating them if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::CreateDirectory`] if either cannot be created.
    pub fn prepare(config_dir: PathBuf, cache_dir: PathBuf) -> Result<Self, StartupError> {
        for dir in [&config_dir, &cache_dir] {
            fs::create_dir_all(dir).map_err(|source| StartupError::CreateDirectory {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(Self {
            config_dir,
            cache_dir,
        })
    }

    /// Directory holding `config.json` and `theme.json`.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Cache directory.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the hub configuration file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    /// Path of the persisted theme record.
    #[must_use]
    pub fn theme_file(&self) -> PathBuf {
        self.config_dir.join("theme.json")
    }

    /// Logs platform and directory details. Used in debug mode.
    pub fn log_environment(&self) {
        tracing::debug!(
            os = std::env::consts::OS,
            arch = std::env::consts::ARCH,
            version = env!("CARGO_PKG_VERSION"),
            "Platform"
        );
        tracing::debug!(
            cwd = ?std::env::current_dir().ok(),
            temp = ?std::env::temp_dir(),
            config = ?self.config_dir,
            cache = ?self.cache_dir,
            "Directories"
        );
    }
}
