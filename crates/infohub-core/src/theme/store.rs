//! # Theme Persistence
//!
//! Key-value record holding the selected theme, stored as JSON.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::PersistenceError;

/// On-disk theme record.
///
/// `custom_theme` is kept as raw JSON so a damaged palette can be detected
/// and discarded without failing the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedTheme {
    /// Mode name (`light`, `dark`, `custom`).
    pub theme: String,

    /// Native stylesheet derived when the record was written.
    #[serde(default)]
    pub stylesheet: String,

    /// Custom palette object; absent unless `theme` is `custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_theme: Option<serde_json::Value>,

    /// Unix timestamp (seconds) of the write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<u64>,
}

/// File-backed store for [`PersistedTheme`].
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store at `path`. Nothing is touched until read or write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the record.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the record; `Ok(None)` when none has been written yet.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the file exists but cannot be read or
    /// parsed.
    pub fn read(&self) -> Result<Option<PersistedTheme>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Writes the record atomically.
    ///
    /// The record is written to a temporary file in the same directory and
    /// renamed over the old one, so readers never see a partial record.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the directory, temporary file or
    /// rename fails.
    pub fn write(&self, record: &PersistedTheme) -> Result<(), PersistenceError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let io_err = |source| PersistenceError::Io {
            path: dir.clone(),
            source,
        };

        fs::create_dir_all(&dir).map_err(io_err)?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        serde_json::to_writer_pretty(&mut tmp, record)?;
        tmp.flush().map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| PersistenceError::Io {
            path: self.path.clone(),
            source: e.error,
        })?;

        tracing::debug!(path = ?self.path, theme = %record.theme, "Saved theme record");
        Ok(())
    }
}
